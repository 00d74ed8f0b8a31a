//! Create the `service` catalog table and seed the default offerings.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

const SEED: [(i32, &str, &str, f64); 5] = [
    (1, "Deep Cleaning", "Complete deep cleaning service", 150.00),
    (2, "Carpet Cleaning", "Professional carpet cleaning", 80.00),
    (3, "Window Cleaning", "Interior and exterior window cleaning", 60.00),
    (4, "Kitchen Cleaning", "Detailed kitchen cleaning", 100.00),
    (5, "Bathroom Cleaning", "Complete bathroom sanitization", 70.00),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Service::Table)
                    .if_not_exists()
                    .col(pk_auto(Service::Id))
                    .col(string_len(Service::Name, 128).not_null())
                    .col(text_null(Service::Description))
                    .col(double(Service::Price).not_null())
                    .col(timestamp_with_time_zone(Service::CreatedAt).default(Expr::current_timestamp()).not_null())
                    .to_owned(),
            )
            .await?;

        let mut insert = Query::insert();
        insert
            .into_table(Service::Table)
            .columns([Service::Id, Service::Name, Service::Description, Service::Price]);
        for (id, name, description, price) in SEED {
            insert.values_panic([id.into(), name.into(), description.into(), price.into()]);
        }
        manager.exec_stmt(insert).await?;

        // Explicit ids bypass the serial sequence on Postgres.
        if manager.get_database_backend() == sea_orm_migration::sea_orm::DatabaseBackend::Postgres {
            manager
                .get_connection()
                .execute_unprepared("SELECT setval(pg_get_serial_sequence('service', 'id'), (SELECT MAX(id) FROM service))")
                .await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Service::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Service { Table, Id, Name, Description, Price, CreatedAt }
