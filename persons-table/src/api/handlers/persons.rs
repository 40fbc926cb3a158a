use axum::{
    Form,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
};
use minijinja::context;
use tracing::{info, instrument};

use crate::{
    AppState,
    api::models::{
        pagination::Page,
        persons::{FieldErrors, PersonForm, QuantityForm},
    },
    errors::{Error, Result},
    flash::Flash,
    store::ResizeOutcome,
    templates,
    types::PersonId,
};

const INDEX_URL: &str = "/";

/// Path segments that don't parse as a number are a missing page, not a bad request
fn parse_path_number(resource: &str, raw: &str) -> Result<i64> {
    raw.parse().map_err(|_| Error::NotFound {
        resource: resource.to_string(),
        id: raw.to_string(),
    })
}

fn parse_person_id(raw: &str) -> Result<PersonId> {
    raw.parse().map_err(|_| Error::person_not_found(raw))
}

fn redirect_with_flash(to: &str, flash: Flash) -> Response {
    (AppendHeaders([(SET_COOKIE, flash.set_cookie())]), Redirect::to(to)).into_response()
}

/// Render the listing. `quantity` is echoed back into the resize form with its error, if any.
async fn render_index(
    state: &AppState,
    page: i64,
    quantity: &QuantityForm,
    quantity_error: Option<&str>,
    flash: Option<Flash>,
) -> Result<String> {
    let total = state.store.count().await?;
    let page = Page::new(page, state.config.page_size, total).ok_or_else(|| Error::NotFound {
        resource: "Page".to_string(),
        id: page.to_string(),
    })?;
    let persons = state.store.list_page(page.skip(), page.per_page).await?;

    Ok(templates::render(
        "index.html",
        context! {
            persons => persons,
            page => page,
            current_quantity => total,
            quantity => quantity.quantity,
            quantity_error => quantity_error,
            flash => flash.map(Flash::message),
        },
    )?)
}

async fn show_index(state: &AppState, page: i64, headers: &HeaderMap) -> Result<Response> {
    let flash = Flash::from_headers(headers);
    let body = render_index(state, page, &QuantityForm::default(), None, flash).await?;

    if flash.is_some() {
        Ok((AppendHeaders([(SET_COOKIE, Flash::clear_cookie())]), Html(body)).into_response())
    } else {
        Ok(Html(body).into_response())
    }
}

async fn submit_quantity(state: &AppState, page: i64, form: QuantityForm) -> Result<Response> {
    let target = match form.validate() {
        Ok(target) => target,
        Err(message) => {
            let body = render_index(state, page, &form, Some(&message), None).await?;
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(body)).into_response());
        }
    };

    match state.store.resize(target).await? {
        ResizeOutcome::Unchanged => info!("Table already holds {} persons", target),
        outcome => info!("Table resized to {} persons: {:?}", target, outcome),
    }

    Ok(Redirect::to(INDEX_URL).into_response())
}

/// `GET /` and `GET /index`: the first page of the listing
pub async fn index(State(state): State<AppState>, headers: HeaderMap) -> Result<Response> {
    show_index(&state, 1, &headers).await
}

/// `GET /index/{page}`
pub async fn index_page(State(state): State<AppState>, Path(page): Path<String>, headers: HeaderMap) -> Result<Response> {
    let page = parse_path_number("Page", &page)?;
    show_index(&state, page, &headers).await
}

/// `POST /` and `POST /index`: resize the table to the submitted quantity
#[instrument(skip_all)]
pub async fn resize(State(state): State<AppState>, Form(form): Form<QuantityForm>) -> Result<Response> {
    submit_quantity(&state, 1, form).await
}

/// `POST /index/{page}`: as [`resize`], re-rendering the same page on a bad quantity
#[instrument(skip_all)]
pub async fn resize_on_page(
    State(state): State<AppState>,
    Path(page): Path<String>,
    Form(form): Form<QuantityForm>,
) -> Result<Response> {
    let page = parse_path_number("Page", &page)?;
    submit_quantity(&state, page, form).await
}

fn render_form(title: &str, action: &str, form: &PersonForm, errors: &FieldErrors) -> Result<String> {
    Ok(templates::render(
        "person_form.html",
        context! {
            title => title,
            action => action,
            form => form,
            errors => errors,
        },
    )?)
}

pub async fn new_person_form() -> Result<Html<String>> {
    Ok(Html(render_form(
        "New entry",
        "/new_person",
        &PersonForm::default(),
        &FieldErrors::new(),
    )?))
}

#[instrument(skip_all)]
pub async fn create_person(State(state): State<AppState>, Form(form): Form<PersonForm>) -> Result<Response> {
    match form.validate(&state.image_probe).await {
        Ok(fields) => {
            state.store.create(&fields).await?;
            Ok(redirect_with_flash(INDEX_URL, Flash::Created))
        }
        Err(errors) => {
            let body = render_form("New entry", "/new_person", &form, &errors)?;
            Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(body)).into_response())
        }
    }
}

pub async fn show_person(State(state): State<AppState>, Path(id): Path<String>) -> Result<Html<String>> {
    let person = state.store.get(parse_person_id(&id)?).await?;
    Ok(Html(templates::render("person.html", context! { person => person })?))
}

pub async fn edit_person_form(State(state): State<AppState>, Path(id): Path<String>) -> Result<Html<String>> {
    let person = state.store.get(parse_person_id(&id)?).await?;
    let action = format!("/person/{}/edit", person.id);

    Ok(Html(render_form(
        "Edit entry",
        &action,
        &PersonForm::from_person(&person),
        &FieldErrors::new(),
    )?))
}

#[instrument(skip_all)]
pub async fn update_person(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<PersonForm>,
) -> Result<Response> {
    let id = parse_person_id(&id)?;
    // 404 before spending a network round trip on the picture link
    state.store.get(id).await?;

    match form.validate(&state.image_probe).await {
        Ok(fields) => {
            state.store.update(id, &fields).await?;
            Ok(redirect_with_flash(INDEX_URL, Flash::Updated))
        }
        Err(errors) => {
            let body = render_form("Edit entry", &format!("/person/{id}/edit"), &form, &errors)?;
            Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(body)).into_response())
        }
    }
}

/// Served on both GET and POST so a plain link can delete
#[instrument(skip_all, fields(id = %id))]
pub async fn delete_person(State(state): State<AppState>, Path(id): Path<String>) -> Result<Response> {
    state.store.delete(parse_person_id(&id)?).await?;
    Ok(redirect_with_flash(INDEX_URL, Flash::Deleted))
}

pub async fn random_person(State(state): State<AppState>) -> Result<Redirect> {
    let id = state.store.random_id().await?;
    Ok(Redirect::to(&format!("/person/{id}")))
}
