pub mod handlers {
    use actix_web::{
        cookie::{Cookie, SameSite},
        delete, get, post, put,
        http::header::{CONTENT_TYPE, LOCATION},
        web, HttpResponse,
    };
    use std::sync::Arc;

    use crate::api::{
        CategoriesResponse, DashboardResponse, GenericResponse, LoginRequest, LoginResponse,
        LogoutResponse, ProductListQuery, ProductPageResponse, ProductResponse, SessionResponse,
        ThemeRequest, ThemeResponse, UpdateProductRequest,
    };
    use crate::auth::{LoggedUser, SESSION_COOKIE};
    use crate::error::{AppError, TraceErr};
    use crate::gate::{GateState, RouteGate};
    use crate::inventory::{
        filter_products, paginate, total_pages, validate_quantity, ALL_CATEGORIES,
    };
    use crate::models::{NewProduct, Product};
    use crate::pages::{landing_page, menu_for, Page, LOGIN_PATH};
    use crate::state::AppState;
    use crate::templates::{get_template_content, render_page, TemplateCache};
    use crate::theme::{load_theme, save_theme};

    type HandlerResult = Result<HttpResponse, actix_web::Error>;

    fn redirect(target: &str) -> HttpResponse {
        HttpResponse::SeeOther()
            .insert_header((LOCATION, target))
            .finish()
    }

    fn html(body: String) -> HttpResponse {
        HttpResponse::Ok()
            .insert_header((CONTENT_TYPE, "text/html; charset=utf-8"))
            .body(body)
    }

    // Gate a page, then render it. The cookie has to carry the token of the
    // active session, otherwise the request is treated like a missing session.
    async fn gated_page(
        state: &AppState,
        user: Option<LoggedUser>,
        cache: &TemplateCache,
        page: Page,
    ) -> HandlerResult {
        let mut gate = RouteGate::for_page(page);
        let target = match gate.check(&state.sessions).await.trace_err("route gate")? {
            GateState::Redirecting { target } => Some(*target),
            _ => None,
        };
        if let Some(target) = target {
            return Ok(redirect(target));
        }

        let presented = user.map(|u| u.session_token);
        let session = gate
            .render(|session| {
                (presented.as_deref() == Some(session.token.as_str())).then(|| session.clone())
            })
            .flatten();
        let Some(session) = session else {
            tracing::debug!("Cookie does not belong to the active session, redirecting");
            return Ok(redirect(LOGIN_PATH));
        };

        let theme = load_theme(state.storage.as_ref()).await?;
        match get_template_content(cache, page.template()) {
            Ok(template) => Ok(html(render_page(&template, Some(&session), theme))),
            Err(resp) => Ok(resp),
        }
    }

    #[get("/style.css")]
    pub async fn serve_css(cache: web::Data<TemplateCache>) -> HttpResponse {
        match get_template_content(&cache, "style.css") {
            Ok(content) => HttpResponse::Ok()
                .content_type("text/css")
                .body(content),
            Err(resp) => resp,
        }
    }

    #[get("/")]
    pub async fn index() -> HttpResponse {
        redirect(LOGIN_PATH)
    }

    #[get("/login")]
    pub async fn login_page(
        state: web::Data<Arc<AppState>>,
        cache: web::Data<TemplateCache>,
    ) -> HandlerResult {
        let theme = load_theme(state.storage.as_ref()).await?;
        match get_template_content(&cache, "login.html") {
            Ok(template) => Ok(html(render_page(&template, None, theme))),
            Err(resp) => Ok(resp),
        }
    }

    #[get("/dashboard")]
    pub async fn dashboard_page(
        state: web::Data<Arc<AppState>>,
        user: Option<LoggedUser>,
        cache: web::Data<TemplateCache>,
    ) -> HandlerResult {
        gated_page(&state, user, &cache, Page::Dashboard).await
    }

    #[get("/products")]
    pub async fn products_page(
        state: web::Data<Arc<AppState>>,
        user: Option<LoggedUser>,
        cache: web::Data<TemplateCache>,
    ) -> HandlerResult {
        gated_page(&state, user, &cache, Page::Products).await
    }

    #[post("/api/session/login")]
    pub async fn session_login(
        state: web::Data<Arc<AppState>>,
        request: web::Json<LoginRequest>,
    ) -> HandlerResult {
        let login_req = request.into_inner();

        match state.sessions.login(&login_req.email, &login_req.password).await {
            Ok(session) => {
                let cookie = Cookie::build(SESSION_COOKIE, session.token.clone())
                    .path("/")
                    .secure(state.secure_cookies)
                    .http_only(true)
                    .same_site(SameSite::Strict)
                    .finish();

                Ok(HttpResponse::Ok()
                    .cookie(cookie)
                    .json(LoginResponse {
                        success: true,
                        error_message: None,
                        redirect_to: Some(landing_page(session.role).path().to_string()),
                        session: Some(session),
                    }))
            }
            Err(AppError::InvalidCredentials) => {
                tracing::warn!("Login failed for {}", login_req.email);
                Ok(HttpResponse::Unauthorized().json(LoginResponse {
                    success: false,
                    error_message: Some(AppError::InvalidCredentials.to_string()),
                    session: None,
                    redirect_to: None,
                }))
            }
            Err(e) => {
                tracing::error!("Login could not complete: {}", e);
                Err(e.into())
            }
        }
    }

    #[post("/api/session/logout")]
    pub async fn session_logout(
        state: web::Data<Arc<AppState>>,
        user: LoggedUser,
    ) -> HandlerResult {
        user.validate(&state).await?;
        let target = state.sessions.logout().await.trace_err("logout")?;

        let removal_cookie = Cookie::build(SESSION_COOKIE, "")
            .path("/")
            .max_age(time::Duration::ZERO)
            .finish();

        Ok(HttpResponse::Ok()
            .cookie(removal_cookie)
            .json(LogoutResponse {
                success: true,
                redirect_to: target.to_string(),
            }))
    }

    #[get("/api/session")]
    pub async fn session_info(
        state: web::Data<Arc<AppState>>,
        user: LoggedUser,
    ) -> HandlerResult {
        let session = user.validate(&state).await?;
        Ok(HttpResponse::Ok().json(SessionResponse {
            success: true,
            role_label: session.role.label(),
            menu: menu_for(session.role),
            can_manage_catalog: session.role.can_manage_catalog(),
            session,
        }))
    }

    #[get("/api/dashboard")]
    pub async fn dashboard_data(
        state: web::Data<Arc<AppState>>,
        user: LoggedUser,
    ) -> HandlerResult {
        user.require(&state, |s| Page::Dashboard.permits(s.role), "Viewing the dashboard")
            .await?;
        let summary = state.dashboard_summary().await.trace_err("dashboard summary")?;
        Ok(HttpResponse::Ok().json(DashboardResponse {
            success: true,
            summary,
        }))
    }

    #[get("/api/products")]
    pub async fn list_products(
        state: web::Data<Arc<AppState>>,
        user: LoggedUser,
        query: web::Query<ProductListQuery>,
    ) -> HandlerResult {
        user.require(&state, |s| Page::Products.permits(s.role), "Viewing products")
            .await?;
        let query = query.into_inner();
        let search = query.q.unwrap_or_default();
        let category = query.category.unwrap_or_else(|| ALL_CATEGORIES.to_string());
        let page = query.page.unwrap_or(1);

        let inventory = state.inventory.read().await;
        let filtered = filter_products(inventory.products(), &search, &category);
        let items: Vec<Product> = paginate(&filtered, state.page_size, page)
            .iter()
            .map(|p| (*p).clone())
            .collect();

        Ok(HttpResponse::Ok().json(ProductPageResponse {
            success: true,
            items,
            page,
            page_size: state.page_size,
            total_items: filtered.len(),
            total_pages: total_pages(filtered.len(), state.page_size),
        }))
    }

    #[get("/api/categories")]
    pub async fn list_categories(
        state: web::Data<Arc<AppState>>,
        user: LoggedUser,
    ) -> HandlerResult {
        user.validate(&state).await?;
        let categories = state.inventory.read().await.categories();
        Ok(HttpResponse::Ok().json(CategoriesResponse {
            success: true,
            categories,
        }))
    }

    #[post("/api/products")]
    pub async fn create_product(
        state: web::Data<Arc<AppState>>,
        user: LoggedUser,
        request: web::Json<NewProduct>,
    ) -> HandlerResult {
        user.require(&state, |s| s.role.can_manage_catalog(), "Adding products")
            .await?;
        let product = state.inventory.write().await.add(request.into_inner())?;
        Ok(HttpResponse::Created().json(ProductResponse {
            success: true,
            product,
        }))
    }

    #[put("/api/products/{id}")]
    pub async fn update_product(
        state: web::Data<Arc<AppState>>,
        user: LoggedUser,
        path: web::Path<String>,
        request: web::Json<UpdateProductRequest>,
    ) -> HandlerResult {
        user.require(&state, |s| s.role.can_edit_products(), "Editing products")
            .await?;
        let id = path.into_inner();
        let req = request.into_inner();
        let product = Product {
            id: id.clone(),
            name: req.name,
            category: req.category,
            quantity: validate_quantity(req.quantity)?,
        };

        let mut inventory = state.inventory.write().await;
        if !inventory.update(product)? {
            return Err(AppError::NotFound(format!("Product {}", id)).into());
        }
        let updated = inventory
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::Internal(format!("Product {} vanished after update", id)))?;
        tracing::info!("Updated product {}", id);
        Ok(HttpResponse::Ok().json(ProductResponse {
            success: true,
            product: updated,
        }))
    }

    #[delete("/api/products/{id}")]
    pub async fn delete_product(
        state: web::Data<Arc<AppState>>,
        user: LoggedUser,
        path: web::Path<String>,
    ) -> HandlerResult {
        user.require(&state, |s| s.role.can_manage_catalog(), "Deleting products")
            .await?;
        let id = path.into_inner();
        if !state.inventory.write().await.delete(&id) {
            return Err(AppError::NotFound(format!("Product {}", id)).into());
        }
        Ok(HttpResponse::Ok().json(GenericResponse::ok()))
    }

    #[get("/api/theme")]
    pub async fn get_theme(state: web::Data<Arc<AppState>>) -> HandlerResult {
        let theme = load_theme(state.storage.as_ref()).await?;
        Ok(HttpResponse::Ok().json(ThemeResponse {
            success: true,
            theme,
        }))
    }

    #[put("/api/theme")]
    pub async fn set_theme(
        state: web::Data<Arc<AppState>>,
        request: web::Json<ThemeRequest>,
    ) -> HandlerResult {
        let theme = request.into_inner().theme;
        save_theme(state.storage.as_ref(), theme).await.trace_err("save theme")?;
        Ok(HttpResponse::Ok().json(ThemeResponse {
            success: true,
            theme,
        }))
    }
}

use actix_web::{error::JsonPayloadError, error::QueryPayloadError, web, HttpRequest};

use crate::error::AppError;

fn json_rejection(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::debug!("Rejected body for {}: {}", req.path(), err);
    AppError::Validation(format!("Malformed request body: {}", err)).into()
}

fn query_rejection(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::debug!("Rejected query for {}: {}", req.path(), err);
    AppError::Validation(format!("Malformed query: {}", err)).into()
}

/// Registers every page and API route. Bodies and queries that fail to
/// decode are answered with the usual JSON failure envelope.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_rejection))
        .app_data(web::QueryConfig::default().error_handler(query_rejection));

    cfg
        // --- Pages ---
        .service(handlers::index)
        .service(handlers::serve_css)
        .service(handlers::login_page)
        .service(handlers::dashboard_page)
        .service(handlers::products_page)

        // --- Session ---
        .service(handlers::session_login)
        .service(handlers::session_logout)
        .service(handlers::session_info)

        // --- Inventory ---
        .service(handlers::dashboard_data)
        .service(handlers::list_products)
        .service(handlers::list_categories)
        .service(handlers::create_product)
        .service(handlers::update_product)
        .service(handlers::delete_product)

        // --- Preferences ---
        .service(handlers::get_theme)
        .service(handlers::set_theme);
}
