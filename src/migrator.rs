use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20240101_000001_create_skus_table::Migration)]
    }
}

mod m20240101_000001_create_skus_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_skus_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Skus::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Skus::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Skus::SkuCode)
                                .string_len(50)
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Skus::Upc).string_len(12).unique_key())
                        .col(ColumnDef::new(Skus::Name).string_len(255).not_null())
                        .col(ColumnDef::new(Skus::Description).text())
                        .col(ColumnDef::new(Skus::Brand).string_len(100))
                        .col(ColumnDef::new(Skus::Category).string_len(50).not_null())
                        .col(ColumnDef::new(Skus::Subcategory).string_len(50))
                        .col(ColumnDef::new(Skus::Price).decimal_len(10, 2))
                        .col(ColumnDef::new(Skus::Cost).decimal_len(10, 2))
                        .col(ColumnDef::new(Skus::UnitOfMeasure).string_len(20))
                        .col(ColumnDef::new(Skus::QuantityPerUnit).integer())
                        .col(ColumnDef::new(Skus::Weight).decimal_len(10, 2))
                        .col(ColumnDef::new(Skus::DimensionLength).decimal_len(10, 2))
                        .col(ColumnDef::new(Skus::DimensionWidth).decimal_len(10, 2))
                        .col(ColumnDef::new(Skus::DimensionHeight).decimal_len(10, 2))
                        .col(ColumnDef::new(Skus::Status).string_len(20).not_null())
                        .col(ColumnDef::new(Skus::Tags).json())
                        .col(ColumnDef::new(Skus::Attributes).json())
                        .col(
                            ColumnDef::new(Skus::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Skus::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Skus::Version)
                                .big_integer()
                                .not_null()
                                .default(0),
                        )
                        .to_owned(),
                )
                .await?;

            // Non-unique indexes supporting filtered listing
            for (name, col) in [
                ("idx_sku_category", Skus::Category),
                ("idx_sku_status", Skus::Status),
                ("idx_sku_brand", Skus::Brand),
            ] {
                manager
                    .create_index(
                        Index::create()
                            .name(name)
                            .table(Skus::Table)
                            .col(col)
                            .if_not_exists()
                            .to_owned(),
                    )
                    .await?;
            }

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Skus::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden, Clone, Copy)]
    enum Skus {
        Table,
        Id,
        SkuCode,
        Upc,
        Name,
        Description,
        Brand,
        Category,
        Subcategory,
        Price,
        Cost,
        UnitOfMeasure,
        QuantityPerUnit,
        Weight,
        DimensionLength,
        DimensionWidth,
        DimensionHeight,
        Status,
        Tags,
        Attributes,
        CreatedAt,
        UpdatedAt,
        Version,
    }
}
