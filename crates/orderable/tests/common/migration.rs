//! Fixture schema

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
	fn migrations() -> Vec<Box<dyn MigrationTrait>> {
		vec![Box::new(CreateTasks)]
	}
}

#[derive(DeriveMigrationName)]
pub struct CreateTasks;

#[async_trait::async_trait]
impl MigrationTrait for CreateTasks {
	async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
		manager
			.create_table(
				Table::create()
					.table(Tasks::Table)
					.if_not_exists()
					.col(
						ColumnDef::new(Tasks::Id)
							.integer()
							.not_null()
							.auto_increment()
							.primary_key(),
					)
					.col(ColumnDef::new(Tasks::Name).text().not_null())
					.col(ColumnDef::new(Tasks::SortOrder).integer().not_null())
					.to_owned(),
			)
			.await?;

		manager
			.create_index(
				Index::create()
					.name("idx_tasks_sort_order_unique")
					.table(Tasks::Table)
					.col(Tasks::SortOrder)
					.unique()
					.to_owned(),
			)
			.await?;

		manager
			.create_table(
				Table::create()
					.table(SubTasks::Table)
					.if_not_exists()
					.col(
						ColumnDef::new(SubTasks::Id)
							.integer()
							.not_null()
							.auto_increment()
							.primary_key(),
					)
					.col(ColumnDef::new(SubTasks::TaskId).integer().not_null())
					.col(ColumnDef::new(SubTasks::Name).text().not_null())
					.col(ColumnDef::new(SubTasks::SortOrder).integer().not_null())
					.foreign_key(
						ForeignKey::create()
							.from(SubTasks::Table, SubTasks::TaskId)
							.to(Tasks::Table, Tasks::Id)
							.on_delete(ForeignKeyAction::Cascade),
					)
					.to_owned(),
			)
			.await?;

		// Orders only need to be unique among the sub tasks of one task
		manager
			.create_index(
				Index::create()
					.name("idx_sub_tasks_task_sort_order_unique")
					.table(SubTasks::Table)
					.col(SubTasks::TaskId)
					.col(SubTasks::SortOrder)
					.unique()
					.to_owned(),
			)
			.await?;

		Ok(())
	}

	async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
		manager
			.drop_table(Table::drop().table(SubTasks::Table).to_owned())
			.await?;
		manager
			.drop_table(Table::drop().table(Tasks::Table).to_owned())
			.await
	}
}

#[derive(DeriveIden)]
enum Tasks {
	Table,
	Id,
	Name,
	SortOrder,
}

#[derive(DeriveIden)]
enum SubTasks {
	Table,
	Id,
	TaskId,
	Name,
	SortOrder,
}
