mod common;

use engine::{CategoryController, CategoryStore, EngineError, ScreenStatus, SpendingController};

use common::{FakeApi, date, network_down, server_error, spending};

fn names(controller: &CategoryController<FakeApi>) -> Vec<String> {
    controller
        .categories()
        .iter()
        .map(|category| category.name.clone())
        .collect()
}

#[tokio::test]
async fn load_fills_the_store_without_signalling() {
    let api = FakeApi::with_categories(&[(1, "Food"), (2, "Transport")]);
    let (writer, reader) = CategoryStore::new();
    let mut categories = CategoryController::new(api.clone(), writer);

    categories.load().await.unwrap();

    assert_eq!(names(&categories), ["Food", "Transport"]);
    assert_eq!(reader.name_of(2).as_deref(), Some("Transport"));
    assert_eq!(categories.status(), &ScreenStatus::Ready);
    assert_eq!(reader.version(), 0);
    assert!(!reader.has_changed());
}

#[tokio::test]
async fn mutations_update_the_store_and_bump_the_version() {
    let api = FakeApi::with_categories(&[(1, "Food")]);
    let (writer, reader) = CategoryStore::new();
    let mut categories = CategoryController::new(api.clone(), writer);
    categories.load().await.unwrap();

    categories.open_form();
    categories.add("  Transport ").await.unwrap();
    assert!(!categories.is_form_open());
    assert_eq!(names(&categories), ["Food", "Transport"]);
    assert_eq!(reader.version(), 1);

    categories.edit(1, "Groceries").await.unwrap();
    assert_eq!(names(&categories), ["Groceries", "Transport"]);
    assert_eq!(reader.version(), 2);

    categories.delete(2).await.unwrap();
    assert_eq!(names(&categories), ["Groceries"]);
    assert_eq!(reader.version(), 3);

    assert_eq!(
        api.calls(),
        [
            "list_categories",
            "add_category",
            "list_categories",
            "edit_category",
            "list_categories",
            "delete_category",
            "list_categories",
        ]
    );
}

#[tokio::test]
async fn blank_names_are_rejected_before_any_request() {
    let api = FakeApi::with_categories(&[(1, "Food")]);
    let (writer, reader) = CategoryStore::new();
    let mut categories = CategoryController::new(api.clone(), writer);

    let err = categories.add("   ").await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
    let err = categories.edit(1, "").await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    assert!(api.calls().is_empty());
    assert_eq!(reader.version(), 0);
}

#[tokio::test]
async fn failed_mutation_does_not_signal() {
    let api = FakeApi::with_categories(&[(1, "Food")]);
    let (writer, reader) = CategoryStore::new();
    let mut categories = CategoryController::new(api.clone(), writer);
    categories.load().await.unwrap();

    api.fail_next(server_error(500));
    let err = categories.edit(1, "Groceries").await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(names(&categories), ["Food"]);
    assert!(!reader.has_changed());
}

#[tokio::test]
async fn failed_delete_restores_the_category() {
    let api = FakeApi::with_categories(&[(1, "Food"), (2, "Transport")]);
    let (writer, reader) = CategoryStore::new();
    let mut categories = CategoryController::new(api.clone(), writer);
    categories.load().await.unwrap();

    api.fail_next(server_error(409));
    let err = categories.delete(2).await.unwrap_err();

    assert_eq!(err.status(), Some(409));
    assert_eq!(names(&categories), ["Food", "Transport"]);
    assert!(!reader.has_changed());
}

#[tokio::test]
async fn failed_delete_with_failed_reload_keeps_the_category() {
    let api = FakeApi::with_categories(&[(1, "Food"), (2, "Transport")]);
    api.seed_spending(spending("a", -100, 2, date(2024, 1, 1)));
    let (writer, reader) = CategoryStore::new();
    let mut categories = CategoryController::new(api.clone(), writer);
    let mut spendings = SpendingController::new(api.clone(), categories.reader());
    categories.load().await.unwrap();
    spendings.load().await.unwrap();

    api.set_lists_down(true);
    api.fail_next(server_error(409));
    let err = categories.delete(2).await.unwrap_err();

    assert_eq!(err.status(), Some(409));
    assert_eq!(names(&categories), ["Food", "Transport"]);
    assert!(matches!(categories.status(), ScreenStatus::Error(_)));
    assert!(!reader.has_changed());
    assert_eq!(spendings.rows()[0].category, "Transport");
}

#[tokio::test]
async fn reload_failure_after_mutation_still_signals() {
    let api = FakeApi::with_categories(&[(1, "Food")]);
    let (writer, reader) = CategoryStore::new();
    let mut categories = CategoryController::new(api.clone(), writer);
    categories.load().await.unwrap();

    api.set_lists_down(true);
    let err = categories.edit(1, "Groceries").await.unwrap_err();

    assert_eq!(err, network_down());
    assert!(matches!(categories.status(), ScreenStatus::Error(_)));
    assert!(reader.has_changed());
}

#[tokio::test]
async fn rename_reaches_the_spending_screen() {
    let api = FakeApi::with_categories(&[(1, "Food"), (2, "Transport")]);
    api.seed_spending(spending("a", -100, 1, date(2024, 1, 1)));
    api.seed_spending(spending("b", -100, 2, date(2024, 2, 1)));

    let (writer, _) = CategoryStore::new();
    let mut categories = CategoryController::new(api.clone(), writer);
    let mut spendings = SpendingController::new(api.clone(), categories.reader());
    categories.load().await.unwrap();
    spendings.load().await.unwrap();

    // Nothing changed yet: no extra fetch.
    api.clear_calls();
    assert!(!spendings.refresh_on_category_change().await.unwrap());
    assert!(api.calls().is_empty());

    categories.edit(1, "Groceries").await.unwrap();
    assert!(spendings.refresh_on_category_change().await.unwrap());
    assert_eq!(
        api.calls(),
        ["edit_category", "list_categories", "list_spendings"]
    );

    let rows = spendings.rows();
    let food_row = rows
        .iter()
        .find(|row| row.spending.category_id == 1)
        .unwrap();
    assert_eq!(food_row.category, "Groceries");

    // The bump was consumed by the reload.
    assert!(!spendings.refresh_on_category_change().await.unwrap());
}

#[tokio::test]
async fn pending_change_waits_for_retry_in_error_state() {
    let api = FakeApi::with_categories(&[(1, "Food")]);
    let (writer, _) = CategoryStore::new();
    let mut categories = CategoryController::new(api.clone(), writer);
    let mut spendings = SpendingController::new(api.clone(), categories.reader());
    categories.load().await.unwrap();

    api.set_lists_down(true);
    spendings.load().await.unwrap_err();
    api.set_lists_down(false);

    categories.edit(1, "Groceries").await.unwrap();
    api.clear_calls();
    assert!(!spendings.refresh_on_category_change().await.unwrap());
    assert!(api.calls().is_empty());

    // Retrying reloads and consumes the pending change.
    spendings.load().await.unwrap();
    assert_eq!(spendings.status(), &ScreenStatus::Ready);
    assert!(!spendings.refresh_on_category_change().await.unwrap());
}

#[tokio::test]
async fn unmounted_spending_screen_ignores_category_changes() {
    let api = FakeApi::with_categories(&[(1, "Food")]);
    let (writer, _) = CategoryStore::new();
    let mut categories = CategoryController::new(api.clone(), writer);
    let mut spendings = SpendingController::new(api.clone(), categories.reader());
    spendings.load().await.unwrap();
    spendings.unmount();

    categories.edit(1, "Groceries").await.unwrap();
    api.clear_calls();
    assert!(!spendings.refresh_on_category_change().await.unwrap());
    assert!(api.calls().is_empty());

    spendings.mount();
    assert!(spendings.refresh_on_category_change().await.unwrap());
}
