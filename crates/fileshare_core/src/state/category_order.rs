//! Manual category ordering driven by up/down moves.
//!
//! # Responsibility
//! - Hold the full ordered category sequence for the management screen.
//! - Swap adjacent entries and persist the complete new order.
//!
//! # Invariants
//! - Moves at the list boundaries are no-ops: nothing persisted, no notify.
//! - After every successful move, ordinals are exactly `0..count`.
//! - The in-memory order only changes after persistence succeeds.

use crate::model::category::Category;
use crate::repo::category_repo::CategoryRepository;
use crate::repo::RepoError;
use crate::state::signal::{Signal, SubscriptionId};
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from category order operations.
#[derive(Debug)]
pub enum CategoryOrderError {
    /// Caller passed an index past the end of the list.
    IndexOutOfRange { index: usize, len: usize },
    /// Loading or persisting order failed.
    Repo(RepoError),
}

impl Display for CategoryOrderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IndexOutOfRange { index, len } => {
                write!(f, "category index {index} out of range for {len} categories")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CategoryOrderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::IndexOutOfRange { .. } => None,
        }
    }
}

impl From<RepoError> for CategoryOrderError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Ordered category list with adjacent-swap reordering.
pub struct CategoryOrderStore<R: CategoryRepository> {
    repo: R,
    categories: Signal<Vec<Category>>,
}

impl<R: CategoryRepository> CategoryOrderStore<R> {
    /// Loads the current order from the repository.
    pub fn load(repo: R) -> Result<Self, CategoryOrderError> {
        let categories = repo.list_categories()?;
        Ok(Self {
            repo,
            categories: Signal::new(categories),
        })
    }

    /// Categories in display order.
    pub fn categories(&self) -> &[Category] {
        self.categories.get()
    }

    pub fn len(&self) -> usize {
        self.categories.get().len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.get().is_empty()
    }

    /// Whether the up control for `index` should be enabled.
    pub fn can_move_up(&self, index: usize) -> bool {
        index > 0 && index < self.len()
    }

    /// Whether the down control for `index` should be enabled.
    pub fn can_move_down(&self, index: usize) -> bool {
        index + 1 < self.len()
    }

    /// Registers a listener notified after every persisted reorder or refresh.
    pub fn subscribe(&mut self, listener: impl FnMut(&Vec<Category>) + 'static) -> SubscriptionId {
        self.categories.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.categories.unsubscribe(id)
    }

    /// Reloads categories after external changes (add, rename, delete).
    pub fn refresh(&mut self) -> Result<(), CategoryOrderError> {
        let categories = self.repo.list_categories()?;
        self.categories.set(categories);
        Ok(())
    }

    /// Moves the category at `index` one position up.
    ///
    /// Returns `Ok(false)` when `index == 0`.
    pub fn move_up(&mut self, index: usize) -> Result<bool, CategoryOrderError> {
        self.check_index(index)?;
        if index == 0 {
            debug!("event=category_move module=state status=noop direction=up index={index}");
            return Ok(false);
        }
        self.swap_and_persist(index - 1, index)?;
        Ok(true)
    }

    /// Moves the category at `index` one position down.
    ///
    /// Returns `Ok(false)` when `index` is the last position.
    pub fn move_down(&mut self, index: usize) -> Result<bool, CategoryOrderError> {
        self.check_index(index)?;
        if index + 1 == self.len() {
            debug!("event=category_move module=state status=noop direction=down index={index}");
            return Ok(false);
        }
        self.swap_and_persist(index, index + 1)?;
        Ok(true)
    }

    fn check_index(&self, index: usize) -> Result<(), CategoryOrderError> {
        let len = self.len();
        if index >= len {
            return Err(CategoryOrderError::IndexOutOfRange { index, len });
        }
        Ok(())
    }

    fn swap_and_persist(&mut self, upper: usize, lower: usize) -> Result<(), CategoryOrderError> {
        let mut reordered = self.categories.get().clone();
        reordered.swap(upper, lower);
        for (position, category) in reordered.iter_mut().enumerate() {
            category.sort_order = position as i64;
        }

        let ordered_ids = reordered.iter().map(|category| category.id).collect::<Vec<_>>();
        self.repo.persist_category_order(&ordered_ids)?;
        info!(
            "event=category_reorder module=state status=ok from={lower} to={upper} count={}",
            reordered.len()
        );

        self.categories.set(reordered);
        Ok(())
    }
}
