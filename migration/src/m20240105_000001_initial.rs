use sea_orm_migration::prelude::*;

/// Users (聊天用户与金币余额)
#[derive(DeriveIden)]
enum Users {
    Table,
    UserId,
    UserName,
    UserNickname,
    UserCoins,
    CreatedAt,
}

/// Boosters (加成器目录, 启动时整表重建)
#[derive(DeriveIden)]
enum Boosters {
    Table,
    Id,
    BoosterName,
    BoosterType,
    BonusAmount,
    BasePrice,
}

/// UserBoosters (用户持有的加成器数量)
#[derive(DeriveIden)]
enum UserBoosters {
    Table,
    Id,
    UserId,
    BoosterId,
    Amount,
}

/// UserLevels (用户等级与经验)
#[derive(DeriveIden)]
enum UserLevels {
    Table,
    Id,
    UserId,
    Level,
    Xp,
    XpNeeded,
}

/// ActionCooldowns (动作冷却时长配置, 启动时整表重建)
#[derive(DeriveIden)]
enum ActionCooldowns {
    Table,
    Action,
    CooldownSecs,
}

/// UserActions (用户动作最近一次成功时间)
#[derive(DeriveIden)]
enum UserActions {
    Table,
    Id,
    UserId,
    Action,
    LastTime,
}

/// Giveaways (抽奖活动)
#[derive(DeriveIden)]
enum Giveaways {
    Table,
    Id,
    GiveawayType,
    Description,
    EndTime,
    WinnersCount,
    MessageId,
    CreatedAt,
}

/// GiveawayGifts (奖品条目, 一行即一个可授予的奖励)
#[derive(DeriveIden)]
enum GiveawayGifts {
    Table,
    Id,
    GiveawayId,
    GiftName,
    Amount,
}

/// GiveawayParticipants (抽奖参与记录, (giveaway, user) 唯一)
#[derive(DeriveIden)]
enum GiveawayParticipants {
    Table,
    Id,
    GiveawayId,
    UserId,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

/// 金额一律以 cents 存储 (展示值 x100)
/// booster_type / giveaway_type / action 以字符串枚举存储
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 用户表 (user_id 为外部聊天平台身份, 非自增)
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::UserId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::UserName).string())
                    .col(ColumnDef::new(Users::UserNickname).string().not_null())
                    .col(
                        ColumnDef::new(Users::UserCoins)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        // 加成器目录表
        manager
            .create_table(
                Table::create()
                    .table(Boosters::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Boosters::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Boosters::BoosterName).string().not_null())
                    .col(
                        ColumnDef::new(Boosters::BoosterType)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Boosters::BonusAmount).big_integer().not_null())
                    .col(ColumnDef::new(Boosters::BasePrice).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_boosters_name_unique")
                    .table(Boosters::Table)
                    .col(Boosters::BoosterName)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 用户持有表
        manager
            .create_table(
                Table::create()
                    .table(UserBoosters::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserBoosters::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserBoosters::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(UserBoosters::BoosterId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserBoosters::Amount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        // (user, booster) 唯一, 一个用户对同一加成器只有一条持有记录
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_user_boosters_pair_unique")
                    .table(UserBoosters::Table)
                    .col(UserBoosters::UserId)
                    .col(UserBoosters::BoosterId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 等级表
        manager
            .create_table(
                Table::create()
                    .table(UserLevels::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserLevels::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserLevels::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(UserLevels::Level)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UserLevels::Xp)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UserLevels::XpNeeded)
                            .big_integer()
                            .not_null()
                            .default(100),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_user_levels_user_unique")
                    .table(UserLevels::Table)
                    .col(UserLevels::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 冷却配置表 (action 字符串主键)
        manager
            .create_table(
                Table::create()
                    .table(ActionCooldowns::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ActionCooldowns::Action)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ActionCooldowns::CooldownSecs)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 用户动作时间表
        manager
            .create_table(
                Table::create()
                    .table(UserActions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserActions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserActions::UserId).big_integer().not_null())
                    .col(ColumnDef::new(UserActions::Action).string_len(32).not_null())
                    .col(
                        ColumnDef::new(UserActions::LastTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // (user, action) 唯一
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_user_actions_pair_unique")
                    .table(UserActions::Table)
                    .col(UserActions::UserId)
                    .col(UserActions::Action)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 抽奖活动表
        manager
            .create_table(
                Table::create()
                    .table(Giveaways::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Giveaways::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Giveaways::GiveawayType)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Giveaways::Description).text().not_null())
                    .col(
                        ColumnDef::new(Giveaways::EndTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Giveaways::WinnersCount)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Giveaways::MessageId).big_integer())
                    .col(
                        ColumnDef::new(Giveaways::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        // 奖品条目表
        manager
            .create_table(
                Table::create()
                    .table(GiveawayGifts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GiveawayGifts::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(GiveawayGifts::GiveawayId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(GiveawayGifts::GiftName).string().not_null())
                    .col(
                        ColumnDef::new(GiveawayGifts::Amount)
                            .big_integer()
                            .not_null()
                            .default(1),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_giveaway_gifts_giveaway")
                    .table(GiveawayGifts::Table)
                    .col(GiveawayGifts::GiveawayId)
                    .to_owned(),
            )
            .await?;

        // 参与记录表
        manager
            .create_table(
                Table::create()
                    .table(GiveawayParticipants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GiveawayParticipants::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(GiveawayParticipants::GiveawayId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GiveawayParticipants::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GiveawayParticipants::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        // (giveaway, user) 唯一, 并发重复报名的兜底
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_giveaway_participants_pair_unique")
                    .table(GiveawayParticipants::Table)
                    .col(GiveawayParticipants::GiveawayId)
                    .col(GiveawayParticipants::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GiveawayParticipants::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GiveawayGifts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Giveaways::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserActions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ActionCooldowns::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserLevels::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserBoosters::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Boosters::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
