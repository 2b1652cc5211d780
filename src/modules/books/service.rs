use chrono::{Datelike, Utc};
use taskshelf_db::{Client, OrderBy, StoreError};
use taskshelf_http::{AppError, ListParams};

use super::models::{
    Book, BookContent, BookFilters, BookListParams, BookPatch, CreateBookRequest,
    UpdateBookRequest,
};
use super::repository::BookRepository;

const ISBN_CONFLICT: &str = "Book with this ISBN already exists";

/// Maps API sort field names onto store columns; unknown names are dropped.
fn sort_field(name: &str) -> Option<&'static str> {
    match name {
        "title" => Some("title"),
        "author" => Some("author"),
        "isbn" => Some("isbn"),
        "genre" => Some("genre"),
        "price" => Some("price"),
        "pages" => Some("pages"),
        "stock" => Some("stock"),
        "publishedYear" => Some("published_year"),
        "createdAt" => Some("created_at"),
        "updatedAt" => Some("updated_at"),
        _ => None,
    }
}

/// Business rules for the book resource: field validation, isbn
/// uniqueness, and not-found translation in front of the repository.
///
/// The isbn pre-check here is best-effort only; the store's unique index
/// is the authoritative constraint, and a violation it reports maps to
/// the same conflict message.
#[derive(Clone)]
pub struct BookService {
    repo: BookRepository,
}

impl BookService {
    pub fn new(db: Client) -> Self {
        Self {
            repo: BookRepository::new(db),
        }
    }

    pub async fn create(&self, request: CreateBookRequest) -> Result<Book, AppError> {
        let title = required_text(request.title, "Title is required")?;
        if title.chars().count() < 3 {
            return Err(AppError::validation("Title must be at least 3 characters"));
        }
        let author = required_text(request.author, "Author is required")?;
        let isbn = required_text(request.isbn, "ISBN is required")?;
        let genre = request
            .genre
            .ok_or_else(|| AppError::validation("Genre is required"))?;
        let published_year = request
            .published_year
            .ok_or_else(|| AppError::validation("Published year is required"))?;
        validate_published_year(published_year)?;
        let pages = request
            .pages
            .ok_or_else(|| AppError::validation("Pages is required"))?;
        if pages < 1 {
            return Err(AppError::validation("Pages must be at least 1"));
        }
        let price = request
            .price
            .ok_or_else(|| AppError::validation("Price is required"))?;
        if price < 0.0 {
            return Err(AppError::validation("Price cannot be negative"));
        }
        let stock = request.stock.unwrap_or(0);
        if stock < 0 {
            return Err(AppError::validation("Stock cannot be negative"));
        }

        if self
            .repo
            .find_by_isbn(&isbn)
            .await
            .map_err(AppError::internal)?
            .is_some()
        {
            return Err(AppError::conflict(ISBN_CONFLICT));
        }

        let content = BookContent {
            title,
            author,
            isbn,
            genre,
            published_year,
            pages,
            price,
            stock,
            description: request.description.map(|d| d.trim().to_string()),
        };

        match self.repo.create(content).await {
            Ok(record) => Ok(record.into()),
            Err(StoreError::UniqueViolation(_)) => Err(AppError::conflict(ISBN_CONFLICT)),
            Err(err) => Err(AppError::internal(err)),
        }
    }

    pub async fn get(&self, id: &str) -> Result<Book, AppError> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(AppError::internal)?
            .map(Book::from)
            .ok_or_else(|| AppError::not_found("Book not found"))
    }

    /// List with structured filters, or search when a non-blank term is
    /// present; search supersedes the filters entirely.
    pub async fn list(&self, params: &BookListParams) -> Result<(Vec<Book>, u64), AppError> {
        let list = params.list();
        let page = if let Some(term) = list.search_term() {
            self.repo.search(term, list.window()).await
        } else {
            let mut order = list.sort_order(sort_field);
            if order.is_empty() {
                order.push(OrderBy::desc("created_at"));
            }
            self.repo
                .find_all(params.filters(), order, list.window())
                .await
        }
        .map_err(AppError::internal)?;

        Ok((page.items.into_iter().map(Book::from).collect(), page.total))
    }

    pub async fn update(&self, id: &str, request: UpdateBookRequest) -> Result<Book, AppError> {
        let existing = self
            .repo
            .find_by_id(id)
            .await
            .map_err(AppError::internal)?
            .ok_or_else(|| AppError::not_found("Book not found"))?;

        let mut patch = BookPatch::default();

        if let Some(title) = request.title {
            let title = title.trim();
            if title.chars().count() < 3 {
                return Err(AppError::validation("Title must be at least 3 characters"));
            }
            patch.title = Some(title.to_string());
        }
        if let Some(author) = request.author {
            let author = author.trim();
            if author.is_empty() {
                return Err(AppError::validation("Author is required"));
            }
            patch.author = Some(author.to_string());
        }
        if let Some(isbn) = request.isbn {
            let isbn = isbn.trim();
            if isbn.is_empty() {
                return Err(AppError::validation("ISBN is required"));
            }
            // Re-check uniqueness only when the isbn actually changes.
            if isbn != existing.isbn {
                if self
                    .repo
                    .find_by_isbn(isbn)
                    .await
                    .map_err(AppError::internal)?
                    .is_some()
                {
                    return Err(AppError::conflict(ISBN_CONFLICT));
                }
                patch.isbn = Some(isbn.to_string());
            }
        }
        if let Some(genre) = request.genre {
            patch.genre = Some(genre);
        }
        if let Some(published_year) = request.published_year {
            validate_published_year(published_year)?;
            patch.published_year = Some(published_year);
        }
        if let Some(pages) = request.pages {
            if pages < 1 {
                return Err(AppError::validation("Pages must be at least 1"));
            }
            patch.pages = Some(pages);
        }
        if let Some(price) = request.price {
            if price < 0.0 {
                return Err(AppError::validation("Price cannot be negative"));
            }
            patch.price = Some(price);
        }
        if let Some(stock) = request.stock {
            if stock < 0 {
                return Err(AppError::validation("Stock cannot be negative"));
            }
            patch.stock = Some(stock);
        }
        if let Some(description) = request.description {
            patch.description = Some(description.trim().to_string());
        }

        match self.repo.update(id, patch).await {
            Ok(Some(record)) => Ok(record.into()),
            Ok(None) => Err(AppError::not_found("Book not found")),
            Err(StoreError::UniqueViolation(_)) => Err(AppError::conflict(ISBN_CONFLICT)),
            Err(err) => Err(AppError::internal(err)),
        }
    }

    pub async fn delete(&self, id: &str) -> Result<Book, AppError> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(AppError::internal)?
            .ok_or_else(|| AppError::not_found("Book not found"))?;

        self.repo
            .delete(id)
            .await
            .map_err(AppError::internal)?
            .map(Book::from)
            .ok_or_else(|| AppError::not_found("Book not found"))
    }

    pub async fn by_genre(
        &self,
        genre: &str,
        params: &ListParams,
    ) -> Result<(Vec<Book>, u64), AppError> {
        let genre = genre.trim();
        if genre.is_empty() {
            return Err(AppError::validation("Genre is required"));
        }

        let filters = BookFilters {
            genre: Some(genre.to_string()),
            ..Default::default()
        };
        self.filtered(filters, params).await
    }

    pub async fn by_author(
        &self,
        author: &str,
        params: &ListParams,
    ) -> Result<(Vec<Book>, u64), AppError> {
        let author = author.trim();
        if author.is_empty() {
            return Err(AppError::validation("Author is required"));
        }

        let filters = BookFilters {
            author: Some(author.to_string()),
            ..Default::default()
        };
        self.filtered(filters, params).await
    }

    /// Inclusive price-range listing. Bounds are validated before any
    /// query executes.
    pub async fn by_price_range(
        &self,
        min_price: f64,
        max_price: f64,
        params: &ListParams,
    ) -> Result<(Vec<Book>, u64), AppError> {
        if min_price < 0.0 || max_price < 0.0 {
            return Err(AppError::validation("Price cannot be negative"));
        }
        if min_price > max_price {
            return Err(AppError::validation(
                "Minimum price cannot be greater than maximum price",
            ));
        }

        let filters = BookFilters {
            min_price: Some(min_price),
            max_price: Some(max_price),
            ..Default::default()
        };
        self.filtered(filters, params).await
    }

    async fn filtered(
        &self,
        filters: BookFilters,
        params: &ListParams,
    ) -> Result<(Vec<Book>, u64), AppError> {
        let page = self
            .repo
            .find_all(filters, vec![OrderBy::desc("created_at")], params.window())
            .await
            .map_err(AppError::internal)?;
        Ok((page.items.into_iter().map(Book::from).collect(), page.total))
    }
}

fn required_text(value: Option<String>, message: &'static str) -> Result<String, AppError> {
    let trimmed = value.as_deref().map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(AppError::validation(message));
    }
    Ok(trimmed.to_string())
}

fn validate_published_year(year: i32) -> Result<(), AppError> {
    if year < 1000 {
        return Err(AppError::validation("Published year must be valid"));
    }
    if year > Utc::now().year() {
        return Err(AppError::validation("Published year cannot be in the future"));
    }
    Ok(())
}
