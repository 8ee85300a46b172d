#![allow(dead_code)]

use sd_orderable::{Group, Orderable, Position, PositionStore};

use std::collections::HashSet;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tempfile::TempDir;

pub mod migration;

pub mod task {
	use sd_orderable::{Orderable, Position};
	use sea_orm::entity::prelude::*;

	#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
	#[sea_orm(table_name = "tasks")]
	pub struct Model {
		#[sea_orm(primary_key)]
		pub id: i32,
		pub name: String,
		pub sort_order: i32,
	}

	#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
	pub enum Relation {
		#[sea_orm(has_many = "super::sub_task::Entity")]
		SubTasks,
	}

	impl Related<super::sub_task::Entity> for Entity {
		fn to() -> RelationDef {
			Relation::SubTasks.def()
		}
	}

	impl ActiveModelBehavior for ActiveModel {}

	impl Orderable for Entity {
		type Id = i32;

		fn id_column() -> Column {
			Column::Id
		}

		fn sort_order_column() -> Column {
			Column::SortOrder
		}

		fn id_of(model: &Model) -> i32 {
			model.id
		}

		fn sort_order_of(model: &Model) -> Position {
			model.sort_order
		}
	}
}

pub mod sub_task {
	use sd_orderable::{Orderable, Position};
	use sea_orm::entity::prelude::*;

	/// Ordered per parent task: `(task_id, sort_order)` is unique.
	#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
	#[sea_orm(table_name = "sub_tasks")]
	pub struct Model {
		#[sea_orm(primary_key)]
		pub id: i32,
		pub task_id: i32,
		pub name: String,
		pub sort_order: i32,
	}

	#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
	pub enum Relation {
		#[sea_orm(
			belongs_to = "super::task::Entity",
			from = "Column::TaskId",
			to = "super::task::Column::Id"
		)]
		Task,
	}

	impl Related<super::task::Entity> for Entity {
		fn to() -> RelationDef {
			Relation::Task.def()
		}
	}

	impl ActiveModelBehavior for ActiveModel {}

	impl Orderable for Entity {
		type Id = i32;

		fn id_column() -> Column {
			Column::Id
		}

		fn sort_order_column() -> Column {
			Column::SortOrder
		}

		fn group_columns() -> &'static [Column] {
			&[Column::TaskId]
		}

		fn id_of(model: &Model) -> i32 {
			model.id
		}

		fn sort_order_of(model: &Model) -> Position {
			model.sort_order
		}
	}
}

/// File backed database with the fixture schema, dropped together with the returned directory.
pub async fn setup() -> (DatabaseConnection, TempDir) {
	let temp_dir = TempDir::new().unwrap();
	let db_path = temp_dir.path().join("orderable.db");

	let mut opt = ConnectOptions::new(format!("sqlite://{}?mode=rwc", db_path.display()));
	opt.max_connections(1).sqlx_logging(false);

	let conn = Database::connect(opt).await.unwrap();
	migration::Migrator::up(&conn, None).await.unwrap();

	(conn, temp_dir)
}

pub mod fixtures {
	use super::{sub_task, task};

	use sd_orderable::ReorderEngine;
	use sea_orm::{ActiveValue::Set, DatabaseConnection, NotSet};

	pub async fn task(
		db: &DatabaseConnection,
		name: &str,
		sort_order: Option<i32>,
	) -> task::Model {
		ReorderEngine::<task::Entity>::default()
			.insert(
				db,
				task::ActiveModel {
					id: NotSet,
					name: Set(name.to_string()),
					sort_order: sort_order.map_or(NotSet, Set),
				},
			)
			.await
			.unwrap()
	}

	/// Task inserted with a fixed primary key, for tests that address rows by id.
	pub async fn task_with_id(db: &DatabaseConnection, id: i32, sort_order: i32) -> task::Model {
		ReorderEngine::<task::Entity>::default()
			.insert(
				db,
				task::ActiveModel {
					id: Set(id),
					name: Set(format!("task {id}")),
					sort_order: Set(sort_order),
				},
			)
			.await
			.unwrap()
	}

	pub async fn sub_task(
		db: &DatabaseConnection,
		parent: &task::Model,
		name: &str,
		sort_order: Option<i32>,
	) -> sub_task::Model {
		ReorderEngine::<sub_task::Entity>::default()
			.insert(
				db,
				sub_task::ActiveModel {
					id: NotSet,
					task_id: Set(parent.id),
					name: Set(name.to_string()),
					sort_order: sort_order.map_or(NotSet, Set),
				},
			)
			.await
			.unwrap()
	}
}

/// Members of `group` in order.
pub async fn members<E: Orderable>(db: &DatabaseConnection, group: &Group<E>) -> Vec<E::Model> {
	PositionStore::<E>::new().members(db, group).await.unwrap()
}

/// `(id, sort_order)` of every member of `group`, in order.
pub async fn layout<E: Orderable>(
	db: &DatabaseConnection,
	group: &Group<E>,
) -> Vec<(E::Id, Position)> {
	members(db, group)
		.await
		.iter()
		.map(|model| (E::id_of(model), E::sort_order_of(model)))
		.collect()
}

pub async fn task_layout(db: &DatabaseConnection) -> Vec<(i32, Position)> {
	layout::<task::Entity>(db, &Group::whole()).await
}

pub fn assert_unique_orders(orders: &[(i32, Position)]) {
	let distinct = orders.iter().map(|(_, order)| order).collect::<HashSet<_>>();
	assert_eq!(distinct.len(), orders.len(), "duplicate sort orders in {orders:?}");
}
