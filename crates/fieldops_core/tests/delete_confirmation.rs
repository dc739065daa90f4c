use fieldops_core::DeleteConfirmation;

#[test]
fn confirm_releases_id_once() {
    let mut confirmation = DeleteConfirmation::default();
    assert_eq!(confirmation.confirm(), None);

    confirmation.request("A1", Some("Acme".to_string()));
    assert_eq!(confirmation.pending_id(), Some("A1"));
    assert_eq!(confirmation.label(), Some("Acme"));

    assert_eq!(confirmation.confirm(), Some("A1".to_string()));
    assert_eq!(confirmation, DeleteConfirmation::Idle);
    assert_eq!(confirmation.confirm(), None);
}

#[test]
fn cancel_drops_selection() {
    let mut confirmation = DeleteConfirmation::default();
    confirmation.request("U7", None);
    confirmation.cancel();

    assert_eq!(confirmation.pending_id(), None);
    assert_eq!(confirmation.confirm(), None);
}
