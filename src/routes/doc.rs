use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{JwtResponse, LoginRequest},
        cart::{CartDto, CartItemDto, CartProduct},
        categories::{CategoryDto, CategoryRequest},
        images::ImageDto,
        orders::{OrderDto, OrderItemDto, OrderList, UpdateOrderStatusRequest},
        products::{AddProductRequest, ProductDto, ProductList, ProductUpdateRequest},
        users::{CreateUserRequest, UserDto, UserUpdateRequest},
    },
    entity::orders::OrderStatus,
    response::ApiResponse,
    routes::{auth, cart, categories, health, images, orders, products, users},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        users::get_user,
        users::create_user,
        users::update_user,
        users::delete_user,
        categories::get_all_categories,
        categories::add_category,
        categories::get_category_by_id,
        categories::get_category_by_name,
        categories::update_category,
        categories::delete_category,
        products::get_all_products,
        products::get_product_by_id,
        products::add_product,
        products::update_product,
        products::delete_product,
        products::get_products_by_brand_and_name,
        products::get_products_by_category_and_brand,
        products::get_products_by_name,
        products::get_products_by_brand,
        products::get_products_by_category,
        products::count_by_brand_and_name,
        images::save_images,
        images::download_image,
        images::update_image,
        images::delete_image,
        cart::get_cart,
        cart::clear_cart,
        cart::get_total_amount,
        cart::add_item_to_cart,
        cart::remove_item_from_cart,
        cart::update_item_quantity,
        orders::create_order,
        orders::get_order_by_id,
        orders::get_user_orders,
        orders::update_order_status
    ),
    components(
        schemas(
            LoginRequest,
            JwtResponse,
            CreateUserRequest,
            UserUpdateRequest,
            UserDto,
            CategoryRequest,
            CategoryDto,
            AddProductRequest,
            ProductUpdateRequest,
            ProductDto,
            ProductList,
            ImageDto,
            CartDto,
            CartItemDto,
            CartProduct,
            OrderStatus,
            OrderDto,
            OrderItemDto,
            OrderList,
            UpdateOrderStatusRequest,
            ApiResponse<ProductDto>,
            ApiResponse<ProductList>,
            ApiResponse<CartDto>,
            ApiResponse<OrderDto>,
            ApiResponse<OrderList>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Login and token issuance"),
        (name = "Users", description = "User account endpoints"),
        (name = "Categories", description = "Category endpoints"),
        (name = "Products", description = "Product catalog endpoints"),
        (name = "Images", description = "Product image endpoints"),
        (name = "Cart", description = "Cart and cart item endpoints"),
        (name = "Orders", description = "Order endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
