use std::marker::PhantomData;

use sea_orm::{
	sea_query::Expr, ColumnTrait, ConnectionTrait, DbErr, QueryFilter, QueryOrder, QuerySelect,
};

use super::{
	group::Group,
	orderable::{Orderable, Position},
};

/// Read-only queries over the positions of a group.
#[derive(Debug)]
pub struct PositionStore<E> {
	_entity: PhantomData<fn() -> E>,
}

impl<E> Clone for PositionStore<E> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<E> Copy for PositionStore<E> {}

impl<E> Default for PositionStore<E> {
	fn default() -> Self {
		Self {
			_entity: PhantomData,
		}
	}
}

impl<E: Orderable> PositionStore<E> {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Highest order in the group, `None` when the group is empty.
	pub async fn max_position(
		&self,
		db: &impl ConnectionTrait,
		group: &Group<E>,
	) -> Result<Option<Position>, DbErr> {
		E::find()
			.select_only()
			.column_as(Expr::col(E::sort_order_column()).max(), "max_position")
			.filter(group.condition())
			.into_tuple::<Option<Position>>()
			.one(db)
			.await
			.map(Option::flatten)
	}

	/// Member with the smallest order strictly greater than `position`.
	pub async fn successor(
		&self,
		db: &impl ConnectionTrait,
		group: &Group<E>,
		position: Position,
	) -> Result<Option<E::Model>, DbErr> {
		E::find()
			.filter(group.condition())
			.filter(E::sort_order_column().gt(position))
			.order_by_asc(E::sort_order_column())
			.one(db)
			.await
	}

	/// Member with the largest order strictly less than `position`.
	pub async fn predecessor(
		&self,
		db: &impl ConnectionTrait,
		group: &Group<E>,
		position: Position,
	) -> Result<Option<E::Model>, DbErr> {
		E::find()
			.filter(group.condition())
			.filter(E::sort_order_column().lt(position))
			.order_by_desc(E::sort_order_column())
			.one(db)
			.await
	}

	pub async fn find(
		&self,
		db: &impl ConnectionTrait,
		id: &E::Id,
	) -> Result<Option<E::Model>, DbErr> {
		E::find()
			.filter(E::id_column().eq(id.clone()))
			.one(db)
			.await
	}

	pub async fn position_of(
		&self,
		db: &impl ConnectionTrait,
		id: &E::Id,
	) -> Result<Option<Position>, DbErr> {
		E::find()
			.select_only()
			.column(E::sort_order_column())
			.filter(E::id_column().eq(id.clone()))
			.into_tuple::<Position>()
			.one(db)
			.await
	}

	/// Every member of the group, ascending by order.
	pub async fn members(
		&self,
		db: &impl ConnectionTrait,
		group: &Group<E>,
	) -> Result<Vec<E::Model>, DbErr> {
		E::find()
			.filter(group.condition())
			.order_by_asc(E::sort_order_column())
			.all(db)
			.await
	}

	/// `(id, order)` of the addressed members, ascending by order. Ids outside the group are
	/// silently left out.
	pub async fn positions_of(
		&self,
		db: &impl ConnectionTrait,
		group: &Group<E>,
		ids: &[E::Id],
	) -> Result<Vec<(E::Id, Position)>, DbErr> {
		E::find()
			.select_only()
			.column(E::id_column())
			.column(E::sort_order_column())
			.filter(group.condition())
			.filter(E::id_column().is_in(ids.iter().cloned()))
			.order_by_asc(E::sort_order_column())
			.into_tuple::<(E::Id, Position)>()
			.all(db)
			.await
	}
}
