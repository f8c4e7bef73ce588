use outline_core::{Document, History, NodeId};

fn add(doc: &mut Document, parent: NodeId, text: &str) -> NodeId {
    let id = doc.add_child(parent).unwrap();
    doc.set_text(id, text).unwrap();
    id
}

#[test]
fn undo_restores_pushed_state_and_redo_restores_the_edit() {
    let mut history = History::new();
    let mut live = Document::with_default_outline();
    let item = live.children(live.root())[0];
    let s0 = live.clone();

    history.push_undo(&live);
    add(&mut live, item, "child");
    let s1 = live.clone();

    assert!(history.undo(&mut live));
    assert_eq!(live, s0);

    assert!(history.redo(&mut live));
    assert_eq!(live, s1);
}

#[test]
fn undo_and_redo_walk_a_chain_of_edits() {
    let mut history = History::new();
    let mut live = Document::with_default_outline();
    let root = live.root();
    let s0 = live.clone();

    history.push_undo(&live);
    add(&mut live, root, "one");
    let s1 = live.clone();
    history.push_undo(&live);
    add(&mut live, root, "two");
    let s2 = live.clone();

    assert!(history.undo(&mut live));
    assert_eq!(live, s1);
    assert!(history.undo(&mut live));
    assert_eq!(live, s0);
    assert!(!history.can_undo());
    assert!(!history.undo(&mut live));
    assert_eq!(live, s0);

    assert!(history.redo(&mut live));
    assert_eq!(live, s1);
    assert!(history.redo(&mut live));
    assert_eq!(live, s2);
    assert!(!history.can_redo());
    assert!(!history.redo(&mut live));
    assert_eq!(live, s2);
}

#[test]
fn redo_is_unavailable_without_a_prior_undo() {
    let mut history = History::new();
    let mut live = Document::with_default_outline();
    let root = live.root();
    history.push_undo(&live);
    add(&mut live, root, "edit");

    assert!(history.can_undo());
    assert!(!history.can_redo());
    assert!(!history.redo(&mut live));
}

#[test]
fn new_edit_after_undo_drops_the_redo_branch() {
    let mut history = History::new();
    let mut live = Document::with_default_outline();
    let root = live.root();

    history.push_undo(&live);
    add(&mut live, root, "abandoned");
    assert!(history.undo(&mut live));

    history.push_undo(&live);
    add(&mut live, root, "kept");
    let kept = live.clone();

    assert!(!history.can_redo());
    assert!(history.undo(&mut live));
    assert!(history.redo(&mut live));
    assert_eq!(live, kept);
}

#[test]
fn snapshots_are_not_affected_by_later_edits() {
    let mut history = History::new();
    let mut live = Document::with_default_outline();
    let item = live.children(live.root())[0];
    history.push_undo(&live);

    live.set_text(item, "changed").unwrap();
    assert!(history.undo(&mut live));

    assert_eq!(live.text(item), Some("Item"));
}

#[test]
fn clear_forgets_every_entry() {
    let mut history = History::new();
    let live = Document::with_default_outline();
    history.push_undo(&live);

    history.clear();

    assert!(history.is_empty());
    assert_eq!(history.cursor(), None);
}
