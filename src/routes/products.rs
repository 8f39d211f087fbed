use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
};

use crate::{
    dto::products::{
        AddProductRequest, BrandAndNameQuery, BrandQuery, CategoryAndBrandQuery, ProductDto,
        ProductList, ProductUpdateRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::product_service::{self, ProductFilter},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/all", get(get_all_products))
        .route("/add", post(add_product))
        .route("/product/{id}/product", get(get_product_by_id))
        .route("/product/{id}/update", put(update_product))
        .route("/product/{id}/delete", delete(delete_product))
        .route("/product/by-brand", get(get_products_by_brand))
        .route("/product/by-category/{category}", get(get_products_by_category))
        .route("/product/count/by-brand/and-name", get(count_by_brand_and_name))
        .route("/products/{name}/products", get(get_products_by_name))
        .route("/by/brand-and-name", get(get_products_by_brand_and_name))
        .route("/by/category-and-brand", get(get_products_by_category_and_brand))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/all",
    responses((status = 200, description = "All products", body = ApiResponse<ProductList>)),
    tag = "Products"
)]
pub async fn get_all_products(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = product_service::list_products(&state.orm, ProductFilter::default()).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/product/{id}/product",
    params(("id" = i64, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product", body = ApiResponse<ProductDto>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn get_product_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<ProductDto>>> {
    Ok(Json(product_service::get_product_by_id(&state.orm, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/products/add",
    request_body = AddProductRequest,
    responses(
        (status = 200, description = "Product created", body = ApiResponse<ProductDto>),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Product with this name and brand exists"),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn add_product(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<AddProductRequest>,
) -> AppResult<Json<ApiResponse<ProductDto>>> {
    Ok(Json(product_service::add_product(&state.orm, &user, payload).await?))
}

#[utoipa::path(
    put,
    path = "/api/v1/products/product/{id}/update",
    params(("id" = i64, Path, description = "Product ID")),
    request_body = ProductUpdateRequest,
    responses(
        (status = 200, description = "Product updated", body = ApiResponse<ProductDto>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<ProductUpdateRequest>,
) -> AppResult<Json<ApiResponse<ProductDto>>> {
    Ok(Json(product_service::update_product(&state.orm, &user, id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/products/product/{id}/delete",
    params(("id" = i64, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product deleted", body = ApiResponse<i64>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<i64>>> {
    Ok(Json(product_service::delete_product(&state.orm, &user, id).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/by/brand-and-name",
    params(
        ("brand" = String, Query, description = "Brand"),
        ("name" = String, Query, description = "Product name")
    ),
    responses(
        (status = 200, description = "Matching products", body = ApiResponse<ProductList>),
        (status = 404, description = "No products found"),
    ),
    tag = "Products"
)]
pub async fn get_products_by_brand_and_name(
    State(state): State<AppState>,
    Query(query): Query<BrandAndNameQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let filter = ProductFilter {
        name: Some(query.name),
        brand: Some(query.brand),
        category: None,
    };
    Ok(Json(product_service::list_products(&state.orm, filter).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/by/category-and-brand",
    params(
        ("category" = String, Query, description = "Category name"),
        ("brand" = String, Query, description = "Brand")
    ),
    responses(
        (status = 200, description = "Matching products", body = ApiResponse<ProductList>),
        (status = 404, description = "No products found"),
    ),
    tag = "Products"
)]
pub async fn get_products_by_category_and_brand(
    State(state): State<AppState>,
    Query(query): Query<CategoryAndBrandQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let filter = ProductFilter {
        name: None,
        brand: Some(query.brand),
        category: Some(query.category),
    };
    Ok(Json(product_service::list_products(&state.orm, filter).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/products/{name}/products",
    params(("name" = String, Path, description = "Product name")),
    responses(
        (status = 200, description = "Matching products", body = ApiResponse<ProductList>),
        (status = 404, description = "No products found"),
    ),
    tag = "Products"
)]
pub async fn get_products_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let filter = ProductFilter {
        name: Some(name),
        ..Default::default()
    };
    Ok(Json(product_service::list_products(&state.orm, filter).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/product/by-brand",
    params(("brand" = String, Query, description = "Brand")),
    responses(
        (status = 200, description = "Matching products", body = ApiResponse<ProductList>),
        (status = 404, description = "No products found"),
    ),
    tag = "Products"
)]
pub async fn get_products_by_brand(
    State(state): State<AppState>,
    Query(query): Query<BrandQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let filter = ProductFilter {
        brand: Some(query.brand),
        ..Default::default()
    };
    Ok(Json(product_service::list_products(&state.orm, filter).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/product/by-category/{category}",
    params(("category" = String, Path, description = "Category name")),
    responses(
        (status = 200, description = "Matching products", body = ApiResponse<ProductList>),
        (status = 404, description = "No products found"),
    ),
    tag = "Products"
)]
pub async fn get_products_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let filter = ProductFilter {
        category: Some(category),
        ..Default::default()
    };
    Ok(Json(product_service::list_products(&state.orm, filter).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/product/count/by-brand/and-name",
    params(
        ("brand" = String, Query, description = "Brand"),
        ("name" = String, Query, description = "Product name")
    ),
    responses((status = 200, description = "Product count", body = ApiResponse<u64>)),
    tag = "Products"
)]
pub async fn count_by_brand_and_name(
    State(state): State<AppState>,
    Query(query): Query<BrandAndNameQuery>,
) -> AppResult<Json<ApiResponse<u64>>> {
    let resp =
        product_service::count_by_brand_and_name(&state.orm, &query.brand, &query.name).await?;
    Ok(Json(resp))
}
