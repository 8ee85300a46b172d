use std::marker::PhantomData;

use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, IdenStatic, ModelTrait, Value};

use super::{
	error::{Error, Result},
	orderable::Orderable,
};

/// Values of a record's group columns, in [`Orderable::group_columns`] order.
///
/// Empty for entities without group columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GroupKey(Vec<Value>);

impl GroupKey {
	#[must_use]
	pub const fn new(values: Vec<Value>) -> Self {
		Self(values)
	}

	#[must_use]
	pub fn of_model<E: Orderable>(model: &E::Model) -> Self {
		Self(
			E::group_columns()
				.iter()
				.map(|column| model.get(*column))
				.collect(),
		)
	}

	/// Reads the key an active model is about to be saved with. Columns left unset keep the
	/// value from `snapshot`, the last state loaded from the store.
	pub fn of_active<E: Orderable>(
		active: &E::ActiveModel,
		snapshot: Option<&E::Model>,
	) -> Result<Self> {
		E::group_columns()
			.iter()
			.map(|column| {
				active
					.get(*column)
					.into_value()
					.or_else(|| snapshot.map(|model| model.get(*column)))
					.ok_or(Error::MissingGroupField(column.as_str()))
			})
			.collect::<Result<Vec<_>>>()
			.map(Self)
	}

	#[must_use]
	pub fn values(&self) -> &[Value] {
		&self.0
	}
}

/// The rows sharing one [`GroupKey`], i.e. the rows competing for the same order values.
#[derive(Debug, Clone)]
pub struct Group<E> {
	key: GroupKey,
	condition: Condition,
	_entity: PhantomData<fn() -> E>,
}

impl<E: Orderable> Group<E> {
	/// Every row of the table, regardless of group columns.
	#[must_use]
	pub fn whole() -> Self {
		Self {
			key: GroupKey::default(),
			condition: Condition::all(),
			_entity: PhantomData,
		}
	}

	#[must_use]
	pub fn resolve(key: GroupKey) -> Self {
		let condition = E::group_columns().iter().zip(key.values()).fold(
			Condition::all(),
			|condition, (column, value)| {
				if *value == value.as_null() {
					condition.add(column.is_null())
				} else {
					condition.add(column.eq(value.clone()))
				}
			},
		);

		Self {
			key,
			condition,
			_entity: PhantomData,
		}
	}

	#[must_use]
	pub fn of_model(model: &E::Model) -> Self {
		Self::resolve(GroupKey::of_model::<E>(model))
	}

	#[must_use]
	pub const fn key(&self) -> &GroupKey {
		&self.key
	}

	#[must_use]
	pub fn condition(&self) -> Condition {
		self.condition.clone()
	}
}
