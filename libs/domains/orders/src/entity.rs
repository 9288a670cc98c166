use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;

/// SeaORM entity for the orders table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub order_date: DateTimeWithTimeZone,
    pub total_amount: f64,
    pub status: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub shipping_address: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// Conversion from SeaORM Model to domain Order
impl From<Model> for crate::models::Order {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            order_date: model.order_date.into(),
            total_amount: model.total_amount,
            status: model.status,
            shipping_address: model.shipping_address,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

// Conversion from domain Order to ActiveModel; id 0 means the store
// assigns one on insert
impl From<crate::models::Order> for ActiveModel {
    fn from(order: crate::models::Order) -> Self {
        ActiveModel {
            id: if order.id == 0 { NotSet } else { Set(order.id) },
            user_id: Set(order.user_id),
            order_date: Set(order.order_date.into()),
            total_amount: Set(order.total_amount),
            status: Set(order.status),
            shipping_address: Set(order.shipping_address),
            created_at: Set(order.created_at.into()),
            updated_at: Set(order.updated_at.into()),
        }
    }
}
