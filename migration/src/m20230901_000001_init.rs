use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{DatabaseBackend, Schema};

use entity::{ArtistEntity, GenreArtistEntity, GenreEntity, GenreVenueEntity, ShowEntity, VenueEntity};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend: DatabaseBackend = manager.get_database_backend();
        let schema = Schema::new(backend);

        // Foreign keys and cascade actions come from the entity relations.
        manager
            .exec_stmt(schema.create_table_from_entity(VenueEntity))
            .await?;
        manager
            .exec_stmt(schema.create_table_from_entity(ArtistEntity))
            .await?;
        manager
            .exec_stmt(schema.create_table_from_entity(GenreEntity))
            .await?;
        manager
            .exec_stmt(schema.create_table_from_entity(ShowEntity))
            .await?;
        manager
            .exec_stmt(schema.create_table_from_entity(GenreVenueEntity))
            .await?;
        manager
            .exec_stmt(schema.create_table_from_entity(GenreArtistEntity))
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GenreArtistEntity).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GenreVenueEntity).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ShowEntity).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GenreEntity).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ArtistEntity).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(VenueEntity).to_owned())
            .await
    }
}
