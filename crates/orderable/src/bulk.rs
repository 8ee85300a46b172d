use std::collections::HashSet;

use sea_orm::{sea_query::Expr, ColumnTrait, QueryFilter, TransactionTrait};
use tracing::{debug, instrument};

use super::{
	error::{Error, Result},
	group::Group,
	orderable::{Orderable, Position},
	reorder::{place, ReorderEngine},
};

impl<E: Orderable> ReorderEngine<E> {
	/// Reorders the members named in `ordered_ids` so they appear in that sequence.
	///
	/// The order values the named members already hold are reused: the smallest goes to the
	/// first id, the next to the second and so on. Members that are not named keep their
	/// values, and so do the gaps between them.
	///
	/// Costs two reads, one batched update and one update per named member, regardless of the
	/// size of the group.
	#[instrument(skip_all, fields(count = ordered_ids.len()))]
	pub async fn set_orders(
		&self,
		db: &impl TransactionTrait,
		group: &Group<E>,
		ordered_ids: &[E::Id],
	) -> Result<Vec<(E::Id, Position)>> {
		if ordered_ids.is_empty() {
			return Ok(vec![]);
		}

		let mut seen = HashSet::with_capacity(ordered_ids.len());
		let duplicates = ordered_ids
			.iter()
			.filter(|id| !seen.insert(*id))
			.map(ToString::to_string)
			.collect::<Vec<_>>();
		if !duplicates.is_empty() {
			return Err(Error::DuplicateIds(duplicates));
		}

		let txn = db.begin().await?;

		let max = self.positions.max_position(&txn, group).await?;
		let donors = self.positions.positions_of(&txn, group, ordered_ids).await?;

		if donors.len() != ordered_ids.len() {
			let found = donors.iter().map(|(id, _)| id).collect::<HashSet<_>>();
			return Err(Error::UnknownIds(
				ordered_ids
					.iter()
					.filter(|id| !found.contains(id))
					.map(ToString::to_string)
					.collect(),
			));
		}

		// Lift every named member past the end of the group at once, so none of the values
		// handed out below is still taken. Lifted values may leave the position range, they never
		// outlive the transaction.
		let offset = i64::from(max.unwrap_or_default().max(0)) + 1;
		E::update_many()
			.col_expr(
				E::sort_order_column(),
				Expr::col(E::sort_order_column()).add(offset),
			)
			.filter(group.condition())
			.filter(E::id_column().is_in(ordered_ids.iter().cloned()))
			.exec(&txn)
			.await?;

		let mut assigned = Vec::with_capacity(ordered_ids.len());
		for (id, (_, position)) in ordered_ids.iter().zip(donors) {
			place::<E>(&txn, id, position).await?;
			assigned.push((id.clone(), position));
		}

		txn.commit().await?;

		debug!(offset, "applied new ordering");

		Ok(assigned)
	}
}
