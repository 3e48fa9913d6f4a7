use chrono::NaiveDate;
use planner_core::db::open_db_in_memory;
use planner_core::{
    Assignment, AssignmentValidationError, CalendarOptions, Category, MonthView, PlannerService,
    RecordRepository, SqliteRecordRepository, YearMonth,
};

fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, day).unwrap()
}

#[test]
fn added_records_are_persisted_and_reloaded() {
    let conn = open_db_in_memory().unwrap();
    {
        let mut service = PlannerService::load(SqliteRecordRepository::new(&conn)).unwrap();
        assert!(service.assignments().is_empty());

        service
            .add_category(Category::new("school", "#1e88e5"))
            .unwrap();
        service
            .add_assignment(Assignment::new("essay", date(3, 5), date(3, 10), 0.5, "school"))
            .unwrap();
        assert_eq!(service.assignments().len(), 1);
    }

    let reloaded = PlannerService::load(SqliteRecordRepository::new(&conn)).unwrap();
    assert_eq!(reloaded.assignments().len(), 1);
    assert_eq!(reloaded.assignments()[0].title, "essay");
    assert_eq!(reloaded.categories()[0].name, "school");
}

#[test]
fn re_adding_same_id_replaces_in_place() {
    let conn = open_db_in_memory().unwrap();
    let mut service = PlannerService::load(SqliteRecordRepository::new(&conn)).unwrap();
    let mut essay = Assignment::new("essay", date(3, 5), date(3, 10), 0.5, "school");
    let lab = Assignment::new("lab", date(3, 1), date(3, 1), 1.0, "school");

    service.add_assignment(essay.clone()).unwrap();
    service.add_assignment(lab.clone()).unwrap();
    essay.weight = 0.9;
    service.add_assignment(essay.clone()).unwrap();

    let ids: Vec<_> = service.assignments().iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![essay.id, lab.id]);
    assert_eq!(service.assignments()[0].weight, 0.9);

    let repo = SqliteRecordRepository::new(&conn);
    let stored = repo.get::<Assignment>(essay.id).unwrap().unwrap();
    assert_eq!(stored.weight, 0.9);
}

#[test]
fn invalid_assignment_is_not_added() {
    let conn = open_db_in_memory().unwrap();
    let mut service = PlannerService::load(SqliteRecordRepository::new(&conn)).unwrap();

    let err = service
        .add_assignment(Assignment::new("bad", date(3, 5), date(3, 4), 0.5, "school"))
        .unwrap_err();

    assert!(matches!(err, AssignmentValidationError::ReversedRange { .. }));
    assert!(service.assignments().is_empty());
}

#[test]
fn re_adding_category_name_updates_the_stored_row() {
    let conn = open_db_in_memory().unwrap();
    let mut service = PlannerService::load(SqliteRecordRepository::new(&conn)).unwrap();
    let first_id = service.add_category(Category::new("school", "red")).unwrap();
    let second_id = service
        .add_category(Category::new("school", "blue"))
        .unwrap();
    service
        .add_assignment(Assignment::new("essay", date(3, 5), date(3, 6), 1.0, "school"))
        .unwrap();

    assert_eq!(second_id, first_id);
    assert_eq!(service.categories().len(), 1);
    assert_eq!(service.categories()[0].color, "blue");

    let stored = SqliteRecordRepository::new(&conn)
        .select_all::<Category>()
        .unwrap();
    assert_eq!(stored, service.categories().to_vec());

    let mut live = MonthView::new(CalendarOptions::default()).unwrap();
    service
        .render_into(&mut live, 2024, 3, 1400.0, date(3, 20))
        .unwrap();
    let reloaded = PlannerService::load(SqliteRecordRepository::new(&conn)).unwrap();
    let mut fresh = MonthView::new(CalendarOptions::default()).unwrap();
    reloaded
        .render_into(&mut fresh, 2024, 3, 1400.0, date(3, 20))
        .unwrap();

    assert_eq!(live.scene(), fresh.scene());
    assert!(live.scene().to_svg().contains("fill=\"blue\""));
}

#[test]
fn storage_failure_keeps_in_memory_state() {
    let conn = open_db_in_memory().unwrap();
    let mut service = PlannerService::load(SqliteRecordRepository::new(&conn)).unwrap();
    conn.execute_batch("DROP TABLE assignments;").unwrap();

    service
        .add_assignment(Assignment::new("essay", date(3, 5), date(3, 6), 1.0, "school"))
        .unwrap();

    assert_eq!(service.assignments().len(), 1);
}

#[test]
fn assignments_touching_filters_by_month() {
    let conn = open_db_in_memory().unwrap();
    let mut service = PlannerService::load(SqliteRecordRepository::new(&conn)).unwrap();
    let inside = Assignment::new("inside", date(3, 2), date(3, 4), 1.0, "school");
    let crossing = Assignment::new("crossing", date(2, 27), date(3, 2), 1.0, "school");
    let around = Assignment::new("around", date(2, 1), date(4, 30), 1.0, "school");
    let elsewhere = Assignment::new("elsewhere", date(5, 1), date(5, 2), 1.0, "school");
    for assignment in [&inside, &crossing, &around, &elsewhere] {
        service.add_assignment(assignment.clone()).unwrap();
    }

    let touching: Vec<_> = service
        .assignments_touching(YearMonth::new(2024, 3).unwrap())
        .into_iter()
        .map(|a| a.id)
        .collect();

    assert_eq!(touching, vec![inside.id, crossing.id, around.id]);
}

#[test]
fn render_into_draws_state_and_skips_cross_month_spans() {
    let conn = open_db_in_memory().unwrap();
    let mut service = PlannerService::load(SqliteRecordRepository::new(&conn)).unwrap();
    service.add_category(Category::new("school", "tomato")).unwrap();
    service
        .add_assignment(Assignment::new("essay", date(3, 5), date(3, 10), 0.5, "school"))
        .unwrap();
    service
        .add_assignment(Assignment::new("trip", date(2, 27), date(3, 2), 1.0, "travel"))
        .unwrap();
    service
        .add_assignment(Assignment::new("later", date(5, 1), date(5, 2), 1.0, "school"))
        .unwrap();

    let mut view = MonthView::new(CalendarOptions::default()).unwrap();
    let report = service
        .render_into(&mut view, 2024, 3, 1500.0, date(3, 15))
        .unwrap();

    assert_eq!(report.bars, 2);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.category_fallbacks, 0);
}
