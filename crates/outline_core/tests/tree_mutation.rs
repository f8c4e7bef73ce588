use outline_core::{Deletion, Document, EditError, NodeId, EMPTY_PLACEHOLDER};

fn add(doc: &mut Document, parent: NodeId, text: &str) -> NodeId {
    let id = doc.add_child(parent).unwrap();
    doc.set_text(id, text).unwrap();
    id
}

fn three_siblings() -> (Document, [NodeId; 3]) {
    let mut doc = Document::new("TODO");
    let root = doc.root();
    let a = add(&mut doc, root, "a");
    let b = add(&mut doc, root, "b");
    let c = add(&mut doc, root, "c");
    (doc, [a, b, c])
}

#[test]
fn promote_second_of_three_siblings_nests_it_under_the_first() {
    let (mut doc, [a, b, c]) = three_siblings();
    let count = doc.tree_len();

    let new_parent = doc.promote(b).unwrap();

    assert_eq!(new_parent, a);
    assert_eq!(doc.parent(b), Some(a));
    assert_eq!(doc.children(a), &[b]);
    assert!(doc.is_last_sibling(b));
    assert!(doc.is_expanded(a));
    assert_eq!(doc.children(doc.root()), &[a, c]);
    assert_eq!(doc.tree_len(), count);
}

#[test]
fn promote_without_preceding_sibling_leaves_tree_unchanged() {
    let (mut doc, [a, _, _]) = three_siblings();
    let before = doc.clone();

    assert_eq!(doc.promote(a), Err(EditError::NoPrecedingSibling(a)));
    assert_eq!(doc, before);
}

#[test]
fn demote_places_node_right_after_its_former_parent() {
    let (mut doc, [a, b, c]) = three_siblings();
    let x = add(&mut doc, a, "x");
    let y = add(&mut doc, a, "y");
    let count = doc.tree_len();

    let new_parent = doc.demote(x).unwrap();

    assert_eq!(new_parent, doc.root());
    assert_eq!(doc.children(doc.root()), &[a, x, b, c]);
    assert_eq!(doc.children(a), &[y]);
    assert_eq!(doc.depth(x), 1);
    assert_eq!(doc.tree_len(), count);
}

#[test]
fn demote_of_top_level_node_is_rejected() {
    let (mut doc, [a, _, _]) = three_siblings();
    let before = doc.clone();

    assert_eq!(doc.demote(a), Err(EditError::NoGrandparent(a)));
    assert_eq!(doc, before);
}

#[test]
fn delete_of_sole_top_level_node_clears_it_in_place() {
    let mut doc = Document::new("TODO");
    let root = doc.root();
    let a = add(&mut doc, root, "a");
    let x = add(&mut doc, a, "x");
    let y = add(&mut doc, a, "y");
    let slots = doc.arena_len();

    let outcome = doc.delete(a).unwrap();

    assert_eq!(outcome, Deletion::Cleared(a));
    assert_eq!(doc.arena_len(), slots);
    assert_eq!(doc.text(a), Some(EMPTY_PLACEHOLDER));
    assert!(doc.children(a).is_empty());
    assert_eq!(doc.parent(x), None);
    assert_eq!(doc.parent(y), None);
    assert_eq!(doc.children(root), &[a]);
}

#[test]
fn delete_detaches_node_from_its_parent() {
    let (mut doc, [a, b, c]) = three_siblings();

    assert_eq!(doc.delete(b).unwrap(), Deletion::Removed);

    assert_eq!(doc.children(doc.root()), &[a, c]);
    assert_eq!(doc.parent(b), None);
    assert!(!doc.is_attached(b));
}

#[test]
fn move_up_and_down_swap_with_neighbours_and_stop_at_boundaries() {
    let (mut doc, [a, b, c]) = three_siblings();

    doc.move_up(b).unwrap();
    assert_eq!(doc.children(doc.root()), &[b, a, c]);
    assert_eq!(doc.move_up(b), Err(EditError::AtBoundary(b)));

    doc.move_down(a).unwrap();
    assert_eq!(doc.children(doc.root()), &[b, c, a]);
    assert_eq!(doc.move_down(a), Err(EditError::AtBoundary(a)));
    assert_eq!(doc.parent(a), Some(doc.root()));
}

#[test]
fn insert_after_places_detached_item_next_to_sibling() {
    let (mut doc, [a, b, c]) = three_siblings();
    let item = doc.create_item("new");

    doc.insert_after(a, item).unwrap();

    assert_eq!(doc.children(doc.root()), &[a, item, b, c]);
    assert_eq!(doc.parent(item), Some(doc.root()));
}

#[test]
fn insert_after_refuses_to_place_node_below_itself() {
    let mut doc = Document::new("TODO");
    let detached = doc.create_item("outer");
    let inner = add(&mut doc, detached, "inner");

    let err = doc.insert_after(inner, detached).unwrap_err();

    assert!(matches!(err, EditError::CycleDetected { node, .. } if node == detached));
}

#[test]
fn insert_after_root_is_rejected() {
    let (mut doc, _) = three_siblings();
    let root = doc.root();
    let item = doc.create_item("new");

    assert_eq!(doc.insert_after(root, item), Err(EditError::NoParent(root)));
}

#[test]
fn toggle_checked_flips_flag() {
    let (mut doc, [a, _, _]) = three_siblings();

    assert!(doc.toggle_checked(a).unwrap());
    assert!(doc.is_checked(a));
    assert!(!doc.toggle_checked(a).unwrap());
    assert!(!doc.is_checked(a));
}

#[test]
fn depth_matches_parent_links_at_every_level() {
    let (mut doc, [a, _, _]) = three_siblings();
    let x = add(&mut doc, a, "x");
    let deep = add(&mut doc, x, "deep");

    for node in [a, x, deep] {
        assert_eq!(doc.depth_below(node, doc.root()), Some(doc.depth(node)));
    }
    assert_eq!(doc.depth(deep), 3);
    assert_eq!(doc.depth_below(deep, a), Some(2));
    assert!(doc.has_descendant(a, deep));
    assert!(!doc.has_descendant(deep, a));
}

#[test]
fn deep_copy_duplicates_subtree_with_fresh_ids() {
    let (mut doc, [a, _, _]) = three_siblings();
    let x = add(&mut doc, a, "x");
    doc.toggle_checked(x).unwrap();

    let copy = doc.deep_copy(a).unwrap();

    assert_ne!(copy, a);
    assert_eq!(doc.text(copy), Some("a"));
    let copied = doc.children(copy).to_vec();
    assert_eq!(copied.len(), 1);
    assert_ne!(copied[0], x);
    assert!(doc.is_checked(copied[0]));
    assert_eq!(doc.parent(copied[0]), Some(copy));
    assert_eq!(doc.children(a), &[x]);
}
