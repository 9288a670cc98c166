use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
};
use axum_helpers::errors::responses::{InternalServerErrorResponse, NotFoundResponse};
use domain_users::repository::UserRepository;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{OrderError, OrderResult};
use crate::models::{CreateOrder, Order, UpdateOrderStatus};
use crate::repository::OrderRepository;
use crate::service::OrderService;

const TAG: &str = "orders";

/// OpenAPI documentation for the Orders API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_orders,
        create_order,
        get_order,
        delete_order,
        list_orders_by_user,
        list_orders_by_status,
        list_user_orders_by_status,
        update_order_status,
        cancel_order,
    ),
    components(
        schemas(Order, CreateOrder, UpdateOrderStatus),
        responses(NotFoundResponse, InternalServerErrorResponse)
    ),
    tags(
        (name = TAG, description = "Order management endpoints")
    )
)]
pub struct ApiDoc;

/// Create the order router with all HTTP endpoints
pub fn router<R, U>(service: OrderService<R, U>) -> Router
where
    R: OrderRepository + 'static,
    U: UserRepository + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route("/user/{user_id}", get(list_orders_by_user))
        .route("/status/{status}", get(list_orders_by_status))
        .route(
            "/user/{user_id}/status/{status}",
            get(list_user_orders_by_status),
        )
        .route("/{id}", get(get_order).delete(delete_order))
        .route("/{id}/status", patch(update_order_status))
        .route("/{id}/cancel", patch(cancel_order))
        .with_state(shared_service)
}

/// List all orders, most recent first
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    responses(
        (status = 200, description = "Orders, most recent order date first", body = Vec<Order>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_orders<R: OrderRepository, U: UserRepository>(
    State(service): State<Arc<OrderService<R, U>>>,
) -> OrderResult<Json<Vec<Order>>> {
    let orders = service.list_orders().await?;
    Ok(Json(orders))
}

/// Place a new order
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateOrder,
    responses(
        (status = 201, description = "Order created successfully", body = Order),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_order<R: OrderRepository, U: UserRepository>(
    State(service): State<Arc<OrderService<R, U>>>,
    Json(input): Json<CreateOrder>,
) -> OrderResult<impl IntoResponse> {
    let order = service.create_order(input).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// Get an order by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i64, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order found", body = Order),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_order<R: OrderRepository, U: UserRepository>(
    State(service): State<Arc<OrderService<R, U>>>,
    Path(id): Path<i64>,
) -> OrderResult<Json<Order>> {
    let order = service
        .get_order(id)
        .await?
        .ok_or(OrderError::NotFound(id))?;
    Ok(Json(order))
}

/// Delete an order
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i64, Path, description = "Order ID")
    ),
    responses(
        (status = 204, description = "Order deleted"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_order<R: OrderRepository, U: UserRepository>(
    State(service): State<Arc<OrderService<R, U>>>,
    Path(id): Path<i64>,
) -> OrderResult<StatusCode> {
    service.delete_order(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List a user's orders
#[utoipa::path(
    get,
    path = "/user/{user_id}",
    tag = TAG,
    params(
        ("user_id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "The user's orders", body = Vec<Order>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_orders_by_user<R: OrderRepository, U: UserRepository>(
    State(service): State<Arc<OrderService<R, U>>>,
    Path(user_id): Path<i64>,
) -> OrderResult<Json<Vec<Order>>> {
    let orders = service.list_orders_by_user(user_id).await?;
    Ok(Json(orders))
}

/// List orders with an exact status
#[utoipa::path(
    get,
    path = "/status/{status}",
    tag = TAG,
    params(
        ("status" = String, Path, description = "Order status")
    ),
    responses(
        (status = 200, description = "Orders with the status", body = Vec<Order>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_orders_by_status<R: OrderRepository, U: UserRepository>(
    State(service): State<Arc<OrderService<R, U>>>,
    Path(status): Path<String>,
) -> OrderResult<Json<Vec<Order>>> {
    let orders = service.list_orders_by_status(&status).await?;
    Ok(Json(orders))
}

/// List a user's orders with an exact status
#[utoipa::path(
    get,
    path = "/user/{user_id}/status/{status}",
    tag = TAG,
    params(
        ("user_id" = i64, Path, description = "User ID"),
        ("status" = String, Path, description = "Order status")
    ),
    responses(
        (status = 200, description = "Matching orders", body = Vec<Order>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_user_orders_by_status<R: OrderRepository, U: UserRepository>(
    State(service): State<Arc<OrderService<R, U>>>,
    Path((user_id, status)): Path<(i64, String)>,
) -> OrderResult<Json<Vec<Order>>> {
    let orders = service.list_user_orders_by_status(user_id, &status).await?;
    Ok(Json(orders))
}

/// Overwrite an order's status
#[utoipa::path(
    patch,
    path = "/{id}/status",
    tag = TAG,
    params(
        ("id" = i64, Path, description = "Order ID")
    ),
    request_body = UpdateOrderStatus,
    responses(
        (status = 200, description = "Status updated", body = Order),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_order_status<R: OrderRepository, U: UserRepository>(
    State(service): State<Arc<OrderService<R, U>>>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateOrderStatus>,
) -> OrderResult<Json<Order>> {
    let order = service.update_order_status(id, &input.status).await?;
    Ok(Json(order))
}

/// Cancel an order
#[utoipa::path(
    patch,
    path = "/{id}/cancel",
    tag = TAG,
    params(
        ("id" = i64, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order cancelled", body = Order),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn cancel_order<R: OrderRepository, U: UserRepository>(
    State(service): State<Arc<OrderService<R, U>>>,
    Path(id): Path<i64>,
) -> OrderResult<Json<Order>> {
    let order = service.cancel_order(id).await?;
    Ok(Json(order))
}
