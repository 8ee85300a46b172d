use std::{fmt, hash::Hash};

use sea_orm::{EntityTrait, TryGetable, Value};

/// A `sort_order` value.
pub type Position = i32;

/// Capability implemented by every entity whose rows keep a unique order.
///
/// The order column must be unique together with [`Orderable::group_columns`], which is how the
/// engine decides which rows compete for the same values.
///
/// ```ignore
/// impl Orderable for sub_task::Entity {
///     type Id = i32;
///
///     fn id_column() -> Self::Column { Column::Id }
///     fn sort_order_column() -> Self::Column { Column::SortOrder }
///     fn group_columns() -> &'static [Self::Column] { &[Column::TaskId] }
///     fn id_of(model: &Model) -> i32 { model.id }
///     fn sort_order_of(model: &Model) -> Position { model.sort_order }
/// }
/// ```
pub trait Orderable: EntityTrait {
	type Id: Into<Value>
		+ TryGetable
		+ Clone
		+ Eq
		+ Hash
		+ fmt::Debug
		+ fmt::Display
		+ Send
		+ Sync
		+ 'static;

	fn id_column() -> Self::Column;

	fn sort_order_column() -> Self::Column;

	/// Columns that are unique together with the order column. Empty means the whole table is
	/// a single group.
	#[must_use]
	fn group_columns() -> &'static [Self::Column] {
		&[]
	}

	fn id_of(model: &Self::Model) -> Self::Id;

	fn sort_order_of(model: &Self::Model) -> Position;
}
