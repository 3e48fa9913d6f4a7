//! In-memory planner state backed by the record repository.
//!
//! # Responsibility
//! - Hold the assignment and category lists the month view renders.
//! - Persist newly added records without blocking the in-memory update.
//!
//! # Invariants
//! - In-memory lists keep insertion order; re-adding an id replaces in place.
//! - Category names are unique: re-adding a name keeps the stored id.
//! - A storage failure never rolls back the in-memory state; it is logged.

use crate::calendar::grid::{GridError, YearMonth};
use crate::calendar::view::{MonthView, RenderReport};
use crate::model::assignment::{Assignment, AssignmentValidationError};
use crate::model::category::{Category, CategoryId, CategoryValidationError};
use crate::model::record::Record;
use crate::repo::record_repo::{InsertMode, RecordRepository, RepoResult};
use chrono::NaiveDate;
use log::{error, info};

/// State container for assignments and categories.
pub struct PlannerService<R: RecordRepository> {
    repo: R,
    assignments: Vec<Assignment>,
    categories: Vec<Category>,
}

impl<R: RecordRepository> PlannerService<R> {
    /// Creates a service and loads every stored record.
    pub fn load(repo: R) -> RepoResult<Self> {
        let assignments = repo.select_all::<Assignment>()?;
        let categories = repo.select_all::<Category>()?;
        info!(
            "event=planner_load module=service status=ok assignments={} categories={}",
            assignments.len(),
            categories.len()
        );
        Ok(Self {
            repo,
            assignments,
            categories,
        })
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Adds an assignment to the state and hands it to storage.
    ///
    /// # Errors
    /// - Validation errors; nothing is stored in that case.
    pub fn add_assignment(
        &mut self,
        assignment: Assignment,
    ) -> Result<(), AssignmentValidationError> {
        assignment.validate()?;
        self.persist(&assignment);
        upsert_by(&mut self.assignments, assignment, |a| a.id);
        Ok(())
    }

    /// Adds a category to the state and hands it to storage.
    ///
    /// A category whose name is already known replaces that entry and takes
    /// over its id, so the stored row is updated rather than duplicated.
    /// Returns the id the category ends up with.
    pub fn add_category(
        &mut self,
        mut category: Category,
    ) -> Result<CategoryId, CategoryValidationError> {
        category.validate()?;
        if let Some(existing) = self.categories.iter().find(|c| c.name == category.name) {
            category.id = existing.id;
        }
        let id = category.id;
        self.persist(&category);
        upsert_by(&mut self.categories, category, |c| c.id);
        Ok(id)
    }

    /// Assignments with at least one day inside `month`, in insertion order.
    pub fn assignments_touching(&self, month: YearMonth) -> Vec<Assignment> {
        self.assignments
            .iter()
            .filter(|assignment| {
                month.contains(assignment.start_date)
                    || month.contains(assignment.end_date)
                    || (YearMonth::of(assignment.start_date) < month
                        && YearMonth::of(assignment.end_date) > month)
            })
            .cloned()
            .collect()
    }

    /// Renders `year`/`month` from the current state into `view`.
    pub fn render_into(
        &self,
        view: &mut MonthView,
        year: i32,
        month: u32,
        container_width_px: f64,
        today: NaiveDate,
    ) -> Result<RenderReport, GridError> {
        let visible = self.assignments_touching(YearMonth::new(year, month)?);
        view.render(
            year,
            month,
            container_width_px,
            &visible,
            &self.categories,
            today,
        )
    }

    fn persist<T: Record>(&self, record: &T) {
        if let Err(err) = self.repo.insert(record, InsertMode::Upsert) {
            error!(
                "event=record_persist module=service status=error table={} id={} error={}",
                T::TABLE,
                record.id(),
                err
            );
        }
    }
}

fn upsert_by<T, K: PartialEq>(items: &mut Vec<T>, item: T, key: impl Fn(&T) -> K) {
    let wanted = key(&item);
    match items.iter().position(|existing| key(existing) == wanted) {
        Some(index) => items[index] = item,
        None => items.push(item),
    }
}
