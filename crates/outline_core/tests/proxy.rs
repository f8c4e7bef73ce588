use outline_core::{Deletion, Document, EditError, NodeId};

fn add(doc: &mut Document, parent: NodeId, text: &str) -> NodeId {
    let id = doc.add_child(parent).unwrap();
    doc.set_text(id, text).unwrap();
    id
}

/// root -> [a -> [a1], b, p => a]
fn transcluded() -> (Document, [NodeId; 4]) {
    let mut doc = Document::new("TODO");
    let root = doc.root();
    let a = add(&mut doc, root, "a");
    let a1 = add(&mut doc, a, "a1");
    let b = add(&mut doc, root, "b");
    let p = doc.create_proxy(a).unwrap();
    doc.insert_after(b, p).unwrap();
    (doc, [a, a1, b, p])
}

#[test]
fn content_reads_and_writes_through_the_proxy() {
    let (mut doc, [a, _, _, p]) = transcluded();

    assert_eq!(doc.text(p), Some("a"));
    doc.set_text(p, "edited via proxy").unwrap();
    assert_eq!(doc.text(a), Some("edited via proxy"));

    doc.toggle_checked(a).unwrap();
    assert!(doc.is_checked(p));
    assert_eq!(doc.changed_at(p), doc.changed_at(a));
}

#[test]
fn proxy_keeps_its_own_position_and_expansion() {
    let (mut doc, [a, _, b, p]) = transcluded();

    doc.set_expanded(p, true);

    assert!(!doc.is_expanded(a));
    assert_eq!(doc.parent(p), Some(doc.root()));
    assert_eq!(doc.preceding_sibling(p), Some(b));
    assert!(doc.is_last_sibling(p));
    assert_eq!(doc.depth(p), 1);
}

#[test]
fn expanded_proxy_shows_wrappers_over_target_children() {
    let (mut doc, [_, a1, _, p]) = transcluded();
    doc.set_expanded(p, true);

    doc.refresh_visible_proxies();
    let view = doc.linearize();

    assert_eq!(view.len(), 4);
    let wrapper = view[3].node;
    assert_eq!(doc.parent(wrapper), Some(p));
    assert_eq!(doc.text(wrapper), Some("a1"));
    assert_eq!(doc.resolve(wrapper), Some(a1));
    assert_eq!(view[3].depth, 2);
}

#[test]
fn wrappers_follow_changes_to_the_target() {
    let (mut doc, [a, a1, _, p]) = transcluded();
    doc.refresh_wrappers(p);
    let first_wrapper = doc.children(p)[0];
    doc.set_expanded(first_wrapper, true);

    let a2 = add(&mut doc, a, "a2");
    doc.move_up(a2).unwrap();
    doc.refresh_wrappers(p);

    let wrappers = doc.children(p).to_vec();
    assert_eq!(wrappers.len(), 2);
    assert_eq!(doc.resolve(wrappers[0]), Some(a2));
    assert_eq!(doc.resolve(wrappers[1]), Some(a1));
    assert_eq!(wrappers[1], first_wrapper);
    assert!(doc.is_expanded(first_wrapper));
}

#[test]
fn add_child_on_proxy_adds_to_target_and_returns_wrapper() {
    let (mut doc, [a, _, _, p]) = transcluded();

    let wrapper = doc.add_child(p).unwrap();

    assert!(doc.is_proxy(wrapper));
    assert_eq!(doc.parent(wrapper), Some(p));
    let created = doc.resolve(wrapper).unwrap();
    assert_eq!(doc.parent(created), Some(a));
    assert_eq!(doc.children(a).len(), 2);
}

#[test]
fn restructuring_inside_a_proxy_is_refused() {
    let (mut doc, [_, _, _, p]) = transcluded();
    let wrapper = doc.add_child(p).unwrap();

    assert_eq!(doc.promote(wrapper), Err(EditError::ProxyContainer(p)));
    assert_eq!(doc.move_up(wrapper), Err(EditError::ProxyContainer(p)));
    assert_eq!(doc.delete(wrapper), Err(EditError::ProxyContainer(p)));
}

#[test]
fn deleting_a_transcluded_node_is_refused_until_the_proxy_is_gone() {
    let (mut doc, [a, a1, _, p]) = transcluded();
    let root = doc.root();

    assert_eq!(doc.delete(a), Err(EditError::TargetOfLiveProxy(a)));
    assert_eq!(doc.children(root).len(), 3);
    assert_eq!(doc.delete(a1), Ok(Deletion::Removed));

    assert_eq!(doc.delete(p), Ok(Deletion::Removed));
    assert_eq!(doc.delete(a), Ok(Deletion::Removed));
}

#[test]
fn deleting_a_subtree_containing_proxy_and_target_is_allowed() {
    let mut doc = Document::new("TODO");
    let root = doc.root();
    let keep = add(&mut doc, root, "keep");
    let group = add(&mut doc, root, "group");
    let target = add(&mut doc, group, "target");
    let p = doc.create_proxy(target).unwrap();
    doc.insert_after(target, p).unwrap();

    assert_eq!(doc.delete(group), Ok(Deletion::Removed));
    assert_eq!(doc.children(root), &[keep]);
}

#[test]
fn deep_copy_of_proxy_references_the_same_target() {
    let (mut doc, [a, _, _, p]) = transcluded();

    let copy = doc.deep_copy(p).unwrap();

    assert_ne!(copy, p);
    assert!(doc.is_proxy(copy));
    assert_eq!(doc.proxy_target(copy), Some(a));
    assert_eq!(doc.parent(copy), None);
}

#[test]
fn undo_snapshot_keeps_proxy_identity_and_drops_wrappers() {
    let (mut doc, [a, _, _, p]) = transcluded();
    doc.set_expanded(p, true);
    doc.refresh_visible_proxies();
    assert_eq!(doc.children(p).len(), 1);

    let snapshot = doc.deep_copy_for_undo();

    assert!(snapshot.is_proxy(p));
    assert_eq!(snapshot.proxy_target(p), Some(a));
    assert!(snapshot.is_expanded(p));
    assert!(snapshot.children(p).is_empty());
}

#[test]
fn proxy_of_proxy_resolves_to_the_item() {
    let (mut doc, [a, a1, _, p]) = transcluded();
    let outer = doc.create_proxy(p).unwrap();
    doc.insert_after(p, outer).unwrap();
    doc.set_expanded(outer, true);

    doc.refresh_visible_proxies();

    assert_eq!(doc.resolve(outer), Some(a));
    assert_eq!(doc.text(outer), Some("a"));
    let wrappers = doc.children(outer).to_vec();
    assert_eq!(wrappers.len(), 1);
    assert_eq!(doc.resolve(wrappers[0]), Some(a1));
}

#[test]
fn unreachable_wrappers_are_released() {
    let (mut doc, [a, a1, _, p]) = transcluded();
    doc.refresh_wrappers(p);
    let stale = doc.children(p)[0];

    doc.delete(a1).unwrap();
    doc.refresh_wrappers(p);
    doc.retain_reachable(&[]);

    assert!(!doc.contains(stale));
    assert!(!doc.contains(a1));
    assert!(doc.children(p).is_empty());
    assert!(doc.contains(a));
}
