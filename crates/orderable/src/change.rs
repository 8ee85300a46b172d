use sea_orm::{sea_query::ValueType, ActiveModelTrait, ActiveValue, DbErr};

use super::{
	error::Result,
	group::GroupKey,
	orderable::{Orderable, Position},
};

/// What a save is about to do to a record's place in its group.
///
/// Built by diffing the record being saved against the state it was last loaded with, then
/// handed to [`ReorderEngine::save`](crate::ReorderEngine::save).
#[derive(Debug, Clone, PartialEq)]
pub struct PendingChange<Id> {
	/// `None` for a record that is not in the store yet.
	pub id: Option<Id>,
	pub old_position: Option<Position>,
	/// `None` asks for the end of the group.
	pub new_position: Option<Position>,
	pub old_group: Option<GroupKey>,
	pub new_group: GroupKey,
}

impl<Id> PendingChange<Id> {
	/// Change for a record that is not in the store yet.
	pub fn insert<E>(active: &E::ActiveModel) -> Result<Self>
	where
		E: Orderable<Id = Id>,
	{
		Ok(Self {
			id: None,
			old_position: None,
			new_position: requested_position::<E>(active)?,
			old_group: None,
			new_group: GroupKey::of_active::<E>(active, None)?,
		})
	}

	/// Change between `snapshot`, the record as last loaded, and `active`, the values about to be
	/// written.
	pub fn diff<E>(snapshot: &E::Model, active: &E::ActiveModel) -> Result<Self>
	where
		E: Orderable<Id = Id>,
	{
		let old_position = E::sort_order_of(snapshot);

		Ok(Self {
			id: Some(E::id_of(snapshot)),
			old_position: Some(old_position),
			new_position: match active.get(E::sort_order_column()) {
				ActiveValue::NotSet => Some(old_position),
				_ => requested_position::<E>(active)?,
			},
			old_group: Some(GroupKey::of_model::<E>(snapshot)),
			new_group: GroupKey::of_active::<E>(active, Some(snapshot))?,
		})
	}

	#[must_use]
	pub fn changes_group(&self) -> bool {
		self.old_group
			.as_ref()
			.is_some_and(|old| *old != self.new_group)
	}
}

fn requested_position<E: Orderable>(active: &E::ActiveModel) -> Result<Option<Position>> {
	match active.get(E::sort_order_column()).into_value() {
		None => Ok(None),
		Some(value) => <Option<Position> as ValueType>::try_from(value)
			.map_err(|e| DbErr::Type(format!("sort order is not an integer: {e}")).into()),
	}
}
