//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{authors, books, copies, editions, health, loans, patrons};
use crate::error::ErrorResponse;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Biblioteca API",
        version = "0.1.0",
        description = "Library Catalog and Lending Manager REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Authors
        authors::list_authors,
        authors::get_author,
        authors::create_author_for_book,
        authors::rename_author,
        authors::unlink_author_from_book,
        // Editions
        editions::list_book_editions,
        editions::get_edition,
        editions::create_edition,
        editions::update_edition,
        editions::delete_edition,
        // Copies
        copies::list_edition_copies,
        copies::get_copy,
        copies::add_copies,
        copies::can_remove_copy,
        copies::remove_copy,
        // Loans
        loans::list_loans,
        loans::get_loan,
        loans::get_active_loan_for_copy,
        loans::create_loan,
        loans::update_loan,
        loans::delete_loan,
        // Patrons
        patrons::list_patrons,
        patrons::get_patron,
        patrons::create_patron,
        patrons::update_patron,
        patrons::delete_patron,
    ),
    components(
        schemas(
            health::HealthResponse,
            ErrorResponse,
            models::author::Author,
            models::author::CreateAuthor,
            models::author::RenameAuthor,
            models::book::Book,
            models::book::BookDetail,
            models::book::DetailBookInput,
            models::book::EditionInput,
            models::book::CreateBookResult,
            models::book::UpdateBook,
            models::edition::Edition,
            models::edition::EditionWithCopies,
            models::edition::CreateEdition,
            models::edition::UpdateEdition,
            models::copy::Copy,
            models::copy::AddCopies,
            models::copy::RemovalCheck,
            models::loan::Loan,
            models::loan::CreateLoan,
            models::loan::UpdateLoan,
            models::patron::Patron,
            models::patron::CreatePatron,
            models::patron::UpdatePatron,
        )
    ),
    tags(
        (name = "health", description = "Service health"),
        (name = "books", description = "Book aggregate operations"),
        (name = "authors", description = "Author lifecycle"),
        (name = "editions", description = "Editions of a book"),
        (name = "copies", description = "Physical copies"),
        (name = "loans", description = "Lending records"),
        (name = "patrons", description = "Library members")
    )
)]
pub struct ApiDoc;

/// Create router serving the Swagger UI and the OpenAPI JSON
pub fn create_openapi_router() -> Router {
    Router::new().merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
