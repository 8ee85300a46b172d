//!
//! # Orderable
//!
//! Keeps a unique integer `sort_order` across the rows of a table, optionally scoped to
//! a group of columns (e.g. every item belonging to the same parent).
//!
//! Any SeaORM entity can take part by implementing [`Orderable`]. From there the
//! [`ReorderEngine`] is the only write path to the order column:
//! - [`ReorderEngine::save`] inserts, moves or regroups a single record, shifting the smallest
//!   possible range of siblings and never tripping the uniqueness constraint on the way;
//! - [`ReorderEngine::set_orders`] applies a whole new ordering at once, reusing the values the
//!   addressed records already hold;
//! - [`ReorderEngine::next`] and [`ReorderEngine::prev`] walk a group in order.
//!
//! Every operation runs inside a single transaction, so a failure never leaves a partially
//! renumbered group behind.
//!
//! ## Basic example
//!
//! ```ignore
//! use sd_orderable::{ReorderEngine, Group};
//! use sea_orm::{ActiveValue::Set, NotSet};
//!
//! let engine = ReorderEngine::<task::Entity>::default();
//!
//! // Appended at the end of the table.
//! let first = engine
//!     .insert(&db, task::ActiveModel { id: NotSet, name: Set("first".into()), sort_order: NotSet })
//!     .await?;
//!
//! // Inserted in front of `first`, which gets bumped along.
//! let second = engine
//!     .insert(&db, task::ActiveModel { id: NotSet, name: Set("second".into()), sort_order: Set(1) })
//!     .await?;
//!
//! // Swap them back.
//! engine.set_orders(&db, &Group::whole(), &[first.id, second.id]).await?;
//! ```

#![warn(
	clippy::all,
	clippy::pedantic,
	clippy::correctness,
	clippy::perf,
	clippy::style,
	clippy::suspicious,
	clippy::complexity,
	clippy::nursery,
	clippy::unwrap_used,
	unused_qualifications,
	rust_2018_idioms,
	trivial_casts,
	trivial_numeric_casts,
	unused_allocation,
	clippy::unnecessary_cast,
	clippy::cast_lossless,
	clippy::cast_possible_truncation,
	clippy::cast_possible_wrap,
	clippy::cast_precision_loss,
	clippy::cast_sign_loss,
	clippy::dbg_macro,
	clippy::deprecated_cfg_attr,
	clippy::separated_literal_suffix,
	deprecated
)]
#![forbid(deprecated_in_future)]
#![allow(clippy::missing_errors_doc, clippy::module_name_repetitions)]

pub mod admin;
mod bulk;
mod change;
mod config;
mod error;
mod group;
mod orderable;
mod position;
mod reorder;

pub use change::PendingChange;
pub use config::OrderingConfig;
pub use error::{Error, Result};
pub use group::{Group, GroupKey};
pub use orderable::{Orderable, Position};
pub use position::PositionStore;
pub use reorder::{ReorderEngine, Transition};
