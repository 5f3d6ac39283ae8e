use sea_orm_migration::prelude::*;

const URL_INDEX: &str = "idx_urls_url";
const URL_INDEX_PREFIX_LEN: u32 = 191;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 urls 表
        manager
            .create_table(
                Table::create()
                    .table(Urls::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Urls::Id)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Urls::Url).text().not_null())
                    .col(
                        ColumnDef::new(Urls::Views)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Urls::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(url_index(manager.get_database_backend()))
            .await?;

        // 创建 sessions 表
        manager
            .create_table(
                Table::create()
                    .table(Sessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sessions::Id)
                            .string_len(255)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Sessions::LastViewTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Sessions::Table).to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name(URL_INDEX).table(Urls::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Urls::Table).to_owned())
            .await
    }
}

/// url 查找索引（非唯一：register 允许同一 URL 存在多条记录）
///
/// MySQL 不能直接对 TEXT 列建索引，使用 191 字符前缀（utf8mb4 下不超过 767 字节）；
/// 前缀写法在 PostgreSQL 上语法无效，所以分后端处理。
fn url_index(backend: sea_orm::DatabaseBackend) -> IndexCreateStatement {
    let mut index = Index::create();
    index.if_not_exists().name(URL_INDEX).table(Urls::Table);
    match backend {
        sea_orm::DatabaseBackend::MySql => index.col((Urls::Url, URL_INDEX_PREFIX_LEN)),
        _ => index.col(Urls::Url),
    };
    index
}

#[derive(DeriveIden)]
enum Urls {
    Table,
    Id,
    Url,
    Views,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Sessions {
    Table,
    Id,
    LastViewTime,
}
