//! Lifecycle events delivered to controller subscribers.

use std::cell::RefCell;
use std::rc::Rc;

use diff_regions::{
    DiffRegionRegistry, DocumentStore, EditEvent, LineSpan, ReconciliationController,
    RegionEvent, Resolution,
};
use url::Url;

type Recorded = Rc<RefCell<Vec<RegionEvent>>>;

fn recording_controller(uri: &Url, text: &str) -> (ReconciliationController<DocumentStore>, Recorded) {
    let store = DocumentStore::new();
    store.open(uri.clone(), text);
    let mut controller = ReconciliationController::new(DiffRegionRegistry::new(), store);

    let events: Recorded = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    controller.subscribe(move |event| sink.borrow_mut().push(event.clone()));
    (controller, events)
}

fn uri(name: &str) -> Url {
    Url::parse(&format!("file:///events/{}.txt", name)).unwrap()
}

#[test]
fn adding_a_region_emits_created_then_updated() {
    let uri = uri("created");
    let (mut controller, events) = recording_controller(&uri, "a\nB\nc");

    let id = controller
        .add_diff_area(&uri, LineSpan::new(1, 2), "b")
        .unwrap();

    let events = events.borrow();
    assert_eq!(
        *events,
        vec![
            RegionEvent::Created {
                document: uri.clone(),
                id,
                span: LineSpan::new(1, 2),
            },
            RegionEvent::Updated {
                document: uri.clone(),
                id,
                span: LineSpan::new(1, 2),
            },
        ]
    );
}

#[test]
fn accept_and_reject_report_their_resolution() {
    let uri = uri("resolution");
    let (mut controller, events) = recording_controller(&uri, "A\nb\nC");
    let first = controller
        .add_diff_area(&uri, LineSpan::new(0, 1), "a")
        .unwrap();
    let second = controller
        .add_diff_area(&uri, LineSpan::new(2, 3), "c")
        .unwrap();
    events.borrow_mut().clear();

    controller.accept(&uri, first).unwrap();
    controller.reject(&uri, second).unwrap();

    let removals: Vec<_> = events
        .borrow()
        .iter()
        .filter_map(|event| match event {
            RegionEvent::Removed { id, resolution, .. } => Some((*id, *resolution)),
            _ => None,
        })
        .collect();
    assert_eq!(
        removals,
        vec![
            (first, Resolution::Accepted),
            (second, Resolution::Rejected)
        ]
    );
}

#[test]
fn edit_that_moves_nothing_emits_nothing() {
    let uri = uri("quiet");
    let (mut controller, events) = recording_controller(&uri, "a\nB\nc\nd");
    controller
        .add_diff_area(&uri, LineSpan::new(1, 2), "b")
        .unwrap();
    events.borrow_mut().clear();

    // Edit below the region: same span, same diff
    let edit = controller
        .host()
        .apply_edit(&uri, LineSpan::new(3, 4), "d\ne")
        .unwrap();
    let text = controller.host().get_document_text(&uri).unwrap();
    controller.handle_edit(EditEvent::new(uri.clone(), edit, text));

    assert!(events.borrow().is_empty());
}

#[test]
fn shifted_region_emits_updated_with_new_span() {
    let uri = uri("shifted");
    let (mut controller, events) = recording_controller(&uri, "a\nB\nc");
    let id = controller
        .add_diff_area(&uri, LineSpan::new(1, 2), "b")
        .unwrap();
    events.borrow_mut().clear();

    let edit = controller
        .host()
        .apply_edit(&uri, LineSpan::empty_at(0), "header")
        .unwrap();
    let text = controller.host().get_document_text(&uri).unwrap();
    controller.handle_edit(EditEvent::new(uri.clone(), edit, text));

    assert_eq!(
        *events.borrow(),
        vec![RegionEvent::Updated {
            document: uri.clone(),
            id,
            span: LineSpan::new(2, 3),
        }]
    );
}

#[test]
fn closing_a_document_discards_every_region() {
    let uri = uri("closing");
    let (mut controller, events) = recording_controller(&uri, "A\nb\nC");
    controller
        .add_diff_area(&uri, LineSpan::new(0, 1), "a")
        .unwrap();
    controller
        .add_diff_area(&uri, LineSpan::new(2, 3), "c")
        .unwrap();
    events.borrow_mut().clear();

    controller.close_document(&uri);

    let events = events.borrow();
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|event| matches!(
        event,
        RegionEvent::Removed {
            resolution: Resolution::Discarded,
            ..
        }
    )));
    assert!(events.iter().all(|event| event.document() == &uri));
}
