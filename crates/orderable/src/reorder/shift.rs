use sea_orm::{
	sea_query::{Expr, SimpleExpr},
	ColumnTrait, Condition, ConnectionTrait, DatabaseTransaction, QueryFilter, QueryOrder,
	QuerySelect, TransactionTrait,
};
use tracing::trace;

use crate::{
	error::{is_unique_violation, Result},
	group::Group,
	orderable::{Orderable, Position},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
	Up,
	Down,
}

impl Direction {
	fn expr<E: Orderable>(self) -> SimpleExpr {
		let column = Expr::col(E::sort_order_column());
		match self {
			Self::Up => column.add(1),
			Self::Down => column.sub(1),
		}
	}
}

/// Moves every member of `group` matching `range` one step in `direction`.
///
/// Tries a single statement first. Stores that check uniqueness row by row can reject it
/// depending on the order rows get visited, in which case the statement is undone and replayed
/// one row at a time, starting from the end of the range next to the free slot.
pub(crate) async fn shift<E: Orderable>(
	txn: &DatabaseTransaction,
	group: &Group<E>,
	range: Condition,
	exclude: Option<&E::Id>,
	direction: Direction,
) -> Result<u64> {
	let mut scope = group.condition().add(range);
	if let Some(id) = exclude {
		scope = scope.add(E::id_column().ne(id.clone()));
	}

	let savepoint = txn.begin().await?;
	match E::update_many()
		.col_expr(E::sort_order_column(), direction.expr::<E>())
		.filter(scope.clone())
		.exec(&savepoint)
		.await
	{
		Ok(res) => {
			savepoint.commit().await?;
			trace!(rows = res.rows_affected, ?direction, "shifted range");
			return Ok(res.rows_affected);
		}
		Err(e) if is_unique_violation(&e) => {
			savepoint.rollback().await?;
			trace!(?direction, "batched shift collided, shifting row by row");
		}
		Err(e) => return Err(e.into()),
	}

	let ids = E::find()
		.select_only()
		.column(E::id_column())
		.filter(scope);
	let ids = match direction {
		Direction::Up => ids.order_by_desc(E::sort_order_column()),
		Direction::Down => ids.order_by_asc(E::sort_order_column()),
	}
	.into_tuple::<E::Id>()
	.all(txn)
	.await?;

	for id in &ids {
		E::update_many()
			.col_expr(E::sort_order_column(), direction.expr::<E>())
			.filter(E::id_column().eq(id.clone()))
			.exec(txn)
			.await?;
	}

	Ok(ids.len() as u64)
}

/// Writes `position` to a single record without touching its other columns.
pub(crate) async fn place<E: Orderable>(
	db: &impl ConnectionTrait,
	id: &E::Id,
	position: Position,
) -> Result<()> {
	E::update_many()
		.col_expr(E::sort_order_column(), Expr::value(position))
		.filter(E::id_column().eq(id.clone()))
		.exec(db)
		.await?;

	Ok(())
}
