use sea_orm::{
	ActiveModelBehavior, ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait,
	DatabaseTransaction, IntoActiveModel, QueryFilter, TransactionTrait,
};
use tracing::{debug, instrument, warn};

use crate::{
	change::PendingChange,
	config::OrderingConfig,
	error::{is_unique_violation, Error, Result},
	group::{Group, GroupKey},
	orderable::{Orderable, Position},
	position::PositionStore,
};

mod plan;
mod shift;

pub use plan::Transition;

pub(crate) use shift::place;
use shift::{shift, Direction};

/// Position right after `position`, if one is left.
fn past(position: Position) -> Result<Position> {
	position
		.checked_add(1)
		.ok_or(Error::PositionOverflow(position))
}

/// Single write path to the order column of `E`.
///
/// Holds no state besides its configuration: every call re-reads the group from the store.
#[derive(Debug)]
pub struct ReorderEngine<E> {
	pub(crate) config: OrderingConfig,
	pub(crate) positions: PositionStore<E>,
}

impl<E> Clone for ReorderEngine<E> {
	fn clone(&self) -> Self {
		Self {
			config: self.config.clone(),
			positions: self.positions,
		}
	}
}

impl<E> Default for ReorderEngine<E> {
	fn default() -> Self {
		Self {
			config: OrderingConfig::default(),
			positions: PositionStore::default(),
		}
	}
}

impl<E: Orderable> ReorderEngine<E> {
	#[must_use]
	pub fn new(config: OrderingConfig) -> Self {
		Self {
			config,
			positions: PositionStore::new(),
		}
	}

	#[must_use]
	pub const fn config(&self) -> &OrderingConfig {
		&self.config
	}

	#[must_use]
	pub const fn positions(&self) -> &PositionStore<E> {
		&self.positions
	}

	/// The member right after `model` in its group.
	pub async fn next(
		&self,
		db: &impl ConnectionTrait,
		model: &E::Model,
	) -> Result<Option<E::Model>> {
		self.positions
			.successor(db, &Group::of_model(model), E::sort_order_of(model))
			.await
			.map_err(Into::into)
	}

	/// The member right before `model` in its group.
	pub async fn prev(
		&self,
		db: &impl ConnectionTrait,
		model: &E::Model,
	) -> Result<Option<E::Model>> {
		self.positions
			.predecessor(db, &Group::of_model(model), E::sort_order_of(model))
			.await
			.map_err(Into::into)
	}

	/// Deletes `model`. Later members only move up to fill the hole when
	/// [`OrderingConfig::close_gaps`] is set.
	#[instrument(skip_all, fields(id = %E::id_of(&model)))]
	pub async fn remove(&self, db: &impl TransactionTrait, model: E::Model) -> Result<()> {
		let id = E::id_of(&model);
		let group = Group::<E>::of_model(&model);

		let txn = db.begin().await?;

		let from = self
			.positions
			.position_of(&txn, &id)
			.await?
			.ok_or_else(|| Error::RecordNotFound(id.to_string()))?;

		E::delete_many()
			.filter(E::id_column().eq(id.clone()))
			.exec(&txn)
			.await?;

		if self.config.close_gaps {
			let closed = shift(
				&txn,
				&group,
				Condition::all().add(E::sort_order_column().gt(from)),
				None,
				Direction::Down,
			)
			.await?;
			debug!(from, closed, "closed gap left by removed record");
		}

		txn.commit().await?;

		Ok(())
	}

	/// Parks the record on a position past the end of `group`, freeing its slot.
	async fn park(
		&self,
		txn: &DatabaseTransaction,
		group: &Group<E>,
		id: Option<&E::Id>,
		from: Position,
	) -> Result<()> {
		let Some(id) = id else {
			return Ok(());
		};

		let scratch = past(
			self.positions
				.max_position(txn, group)
				.await?
				.map_or(from, |max| max.max(from)),
		)?;

		place::<E>(txn, id, scratch).await
	}

	async fn leave(
		&self,
		txn: &DatabaseTransaction,
		old_group: &Group<E>,
		id: &E::Id,
		from: Position,
	) -> Result<()> {
		if !self.config.close_gaps {
			return Ok(());
		}

		self.park(txn, old_group, Some(id), from).await?;
		shift(
			txn,
			old_group,
			Condition::all().add(E::sort_order_column().gt(from)),
			Some(id),
			Direction::Down,
		)
		.await?;

		Ok(())
	}

	/// Applies `transition` to the siblings in `group` and returns the position the record ends
	/// up with.
	async fn run(
		&self,
		txn: &DatabaseTransaction,
		group: &Group<E>,
		id: Option<&E::Id>,
		transition: Transition,
	) -> Result<Position> {
		let order = E::sort_order_column();

		match transition {
			Transition::Unchanged { at } => Ok(at),

			Transition::Append { from: None } => {
				match self.positions.max_position(txn, group).await? {
					Some(max) => past(max),
					None => Ok(self.config.first_position),
				}
			}

			Transition::Append { from: Some(from) } => {
				match self.positions.max_position(txn, group).await? {
					Some(to) if to > from => self.move_later(txn, group, id, from, to).await,
					_ => Ok(from),
				}
			}

			Transition::Insert { at } => {
				// The last member moves up along with everything else.
				let max = self.positions.max_position(txn, group).await?;
				if let Some(max) = max.filter(|max| *max >= at) {
					past(max)?;
				}
				shift(
					txn,
					group,
					Condition::all().add(order.gte(at)),
					id,
					Direction::Up,
				)
				.await?;
				Ok(at)
			}

			Transition::MoveEarlier { from, to } => {
				self.park(txn, group, id, from).await?;
				shift(
					txn,
					group,
					Condition::all().add(order.gte(to)).add(order.lt(from)),
					id,
					Direction::Up,
				)
				.await?;
				Ok(to)
			}

			Transition::MoveLater { from, to } => self.move_later(txn, group, id, from, to).await,
		}
	}

	async fn move_later(
		&self,
		txn: &DatabaseTransaction,
		group: &Group<E>,
		id: Option<&E::Id>,
		from: Position,
		to: Position,
	) -> Result<Position> {
		let order = E::sort_order_column();

		self.park(txn, group, id, from).await?;
		shift(
			txn,
			group,
			Condition::all().add(order.gt(from)).add(order.lte(to)),
			id,
			Direction::Down,
		)
		.await?;

		Ok(to)
	}
}

impl<E> ReorderEngine<E>
where
	E: Orderable,
	E::Model: IntoActiveModel<E::ActiveModel>,
	E::ActiveModel: ActiveModelBehavior + Send,
{
	/// Saves a record that is not in the store yet. Without a `sort_order` it is appended to
	/// its group, otherwise it is inserted at the requested position.
	pub async fn insert(
		&self,
		db: &impl TransactionTrait,
		active: E::ActiveModel,
	) -> Result<E::Model> {
		let change = PendingChange::insert::<E>(&active)?;
		self.save(db, active, change).await
	}

	/// Saves `active` over `snapshot`, the record as it was last loaded.
	pub async fn update(
		&self,
		db: &impl TransactionTrait,
		snapshot: &E::Model,
		active: E::ActiveModel,
	) -> Result<E::Model> {
		let change = PendingChange::diff::<E>(snapshot, &active)?;
		self.save(db, active, change).await
	}

	/// Moves the record described by `change` into place and persists `active` with the
	/// resulting position, all in one transaction.
	///
	/// A uniqueness violation, meaning a concurrent writer moved things under us, is retried
	/// exactly once with the record's state re-read from the store.
	#[instrument(
		skip_all,
		fields(id = ?change.id, old = ?change.old_position, new = ?change.new_position)
	)]
	pub async fn save(
		&self,
		db: &impl TransactionTrait,
		active: E::ActiveModel,
		change: PendingChange<E::Id>,
	) -> Result<E::Model> {
		if let Some(position) = change.new_position.filter(|position| *position < 0) {
			return Err(Error::NegativePosition(position));
		}

		let txn = db.begin().await?;

		let model = match self.attempt(&txn, active.clone(), &change).await {
			Ok(model) => model,
			Err(e) if e.is_uniqueness_conflict() => {
				warn!(%e, "sort order conflict, retrying with fresh state");
				let change = self.refresh(&txn, change).await?;
				self.attempt(&txn, active, &change)
					.await
					.map_err(|e| match e {
						Error::Database(e) if is_unique_violation(&e) => {
							Error::UnresolvedConflict(e)
						}
						e => e,
					})?
			}
			Err(e) => return Err(e),
		};

		txn.commit().await?;

		Ok(model)
	}

	async fn attempt(
		&self,
		txn: &DatabaseTransaction,
		active: E::ActiveModel,
		change: &PendingChange<E::Id>,
	) -> Result<E::Model> {
		let savepoint = txn.begin().await?;

		match self.apply(&savepoint, active, change).await {
			Ok(model) => {
				savepoint.commit().await?;
				Ok(model)
			}
			Err(e) => {
				savepoint.rollback().await?;
				Err(e)
			}
		}
	}

	async fn apply(
		&self,
		txn: &DatabaseTransaction,
		mut active: E::ActiveModel,
		change: &PendingChange<E::Id>,
	) -> Result<E::Model> {
		let id = change.id.as_ref();
		let group = Group::<E>::resolve(change.new_group.clone());

		let (old, new) = if change.changes_group() {
			if let (Some(id), Some(old_group), Some(from)) =
				(id, &change.old_group, change.old_position)
			{
				self.leave(txn, &Group::resolve(old_group.clone()), id, from)
					.await?;
			}

			// A record arriving in a group only keeps a position the caller asked for.
			(
				None,
				change
					.new_position
					.filter(|position| Some(*position) != change.old_position),
			)
		} else {
			(change.old_position, change.new_position)
		};

		let transition = Transition::plan(old, new);
		debug!(?transition, "reordering");

		let position = self.run(txn, &group, id, transition).await?;
		active.set(E::sort_order_column(), position.into());

		let model = if id.is_some() {
			active.update(txn).await?
		} else {
			active.insert(txn).await?
		};

		Ok(model)
	}

	/// Rebuilds `change` on top of the record's currently persisted state.
	async fn refresh(
		&self,
		db: &impl ConnectionTrait,
		change: PendingChange<E::Id>,
	) -> Result<PendingChange<E::Id>> {
		let Some(id) = change.id.clone() else {
			return Ok(change);
		};

		let current = self
			.positions
			.find(db, &id)
			.await?
			.ok_or_else(|| Error::RecordNotFound(id.to_string()))?;
		let position = E::sort_order_of(&current);

		let new_position = if change.new_position == change.old_position {
			Some(position)
		} else {
			change.new_position
		};

		Ok(PendingChange {
			id: Some(id),
			old_position: Some(position),
			new_position,
			old_group: Some(GroupKey::of_model::<E>(&current)),
			new_group: change.new_group,
		})
	}
}
