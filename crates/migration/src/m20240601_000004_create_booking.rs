//! Create `booking` table with FKs to `user` (owner) and `service`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Booking::Table)
                    .if_not_exists()
                    .col(pk_auto(Booking::Id))
                    .col(string_len(Booking::CustomerName, 255).not_null())
                    .col(string_len(Booking::Address, 512).not_null())
                    .col(date_time(Booking::DateTime).not_null())
                    .col(integer(Booking::ServiceId).not_null())
                    .col(integer(Booking::UserId).not_null())
                    .col(string_len(Booking::Status, 16).default("pending").not_null())
                    .col(timestamp_with_time_zone(Booking::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_service")
                            .from(Booking::Table, Booking::ServiceId)
                            .to(Service::Table, Service::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_user")
                            .from(Booking::Table, Booking::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Booking::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Booking { Table, Id, CustomerName, Address, DateTime, ServiceId, UserId, Status, CreatedAt }

#[derive(DeriveIden)]
enum Service { Table, Id }

#[derive(DeriveIden)]
enum User { Table, Id }
