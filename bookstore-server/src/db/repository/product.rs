//! Product Repository
//!
//! A product carries a polymorphic specific product (book or board game)
//! chosen by its product type. Both documents are written in the same
//! transaction, together with every inverse list the book's relation groups
//! touch: contributors, publisher, series, and the product's sections.

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    AuthorRole, BoardGame, BoardGameCreate, BoardGameUpdate, Book, BookCreate, BookSeries,
    BookUpdate, CompilerRole, Contributor, ContributorRole, EditorRole, IllustratorRole, Product,
    ProductCreate, ProductDetail, ProductKind, ProductType, ProductUpdate, Publisher, Section,
    SpecificProduct, TranslatorRole,
};
use shared::query::ListQuery;
use shared::util::{new_id, now_millis, slugify};

use super::{
    contributor_books, ensure_unique, publisher_books, require_existing, section_products,
    series_books,
};
use crate::db::PRODUCT_CODE_COUNTER;
use crate::db::query::paginate;
use crate::db::references::{dedup, sync_many, sync_single, unlink_all};
use crate::db::{DocumentStore, Scope, WriteScope, soft_delete};
use crate::utils::validation::{
    Checks, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, MAX_URL_LEN, validate_optional_text,
    validate_required_text,
};

#[derive(Clone)]
pub struct ProductRepository {
    store: DocumentStore,
}

fn key_taken(key: &str) -> AppError {
    AppError::with_message(
        ErrorCode::ProductKeyExists,
        format!("Product key '{key}' already exists"),
    )
    .with_detail("key", key)
}

fn resolve_kind(scope: &impl Scope, type_id: &str) -> AppResult<ProductKind> {
    scope
        .find::<ProductType>(type_id)?
        .map(|t| t.key)
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::ProductTypeNotFound,
                format!("Product type {type_id} not found"),
            )
            .with_id(type_id)
        })
}

fn normalize_key(raw: &str) -> AppResult<String> {
    let key = slugify(raw);
    if key.is_empty() {
        return Err(AppError::validation("key must contain letters or digits"));
    }
    Ok(key)
}

fn validate_images(images: &[String]) -> AppResult<()> {
    for image in images {
        validate_required_text(image, "images[]", MAX_URL_LEN)?;
    }
    Ok(())
}

fn validate_book(data: &BookUpdate) -> AppResult<()> {
    let mut checks = Checks::new();
    checks
        .check(validate_optional_text(&data.isbn, "isbn", MAX_SHORT_TEXT_LEN))
        .check(validate_optional_text(&data.cover_type, "coverType", MAX_SHORT_TEXT_LEN))
        .check(validate_optional_text(&data.description, "description", MAX_NOTE_LEN));
    checks.finish()
}

fn validate_board_game(game: &BoardGame) -> AppResult<()> {
    let mut checks = Checks::new();
    if let (Some(min), Some(max)) = (game.min_players, game.max_players) {
        checks.ensure(min <= max, "minPlayers must not exceed maxPlayers");
    }
    checks.ensure(game.min_players != Some(0), "minPlayers must be at least 1");
    checks.check(validate_optional_text(&game.description, "description", MAX_NOTE_LEN));
    checks.finish()
}

fn book_create_as_update(data: BookCreate) -> BookUpdate {
    BookUpdate {
        authors: Some(data.authors),
        compilers: Some(data.compilers),
        translators: Some(data.translators),
        illustrators: Some(data.illustrators),
        editors: Some(data.editors),
        publisher: Some(data.publisher),
        series: Some(data.series),
        languages: Some(data.languages),
        isbn: data.isbn,
        pages: data.pages,
        year: data.year,
        cover_type: data.cover_type,
        description: data.description,
    }
}

/// Sync one contributor group of `book` when the update names it
fn sync_group<R: ContributorRole>(
    scope: &mut WriteScope,
    book: &mut Book,
    new: Option<Vec<String>>,
) -> AppResult<()> {
    if let Some(new) = new {
        let old = R::book_refs_mut(book).clone();
        let kept = sync_many::<Contributor<R>>(scope, &book.id, &old, &new, contributor_books::<R>)?;
        *R::book_refs_mut(book) = kept;
    }
    Ok(())
}

/// Apply a book patch, keeping every inverse list in step
fn apply_book(scope: &mut WriteScope, book: &mut Book, data: BookUpdate) -> AppResult<()> {
    validate_book(&data)?;

    sync_group::<AuthorRole>(scope, book, data.authors)?;
    sync_group::<CompilerRole>(scope, book, data.compilers)?;
    sync_group::<TranslatorRole>(scope, book, data.translators)?;
    sync_group::<IllustratorRole>(scope, book, data.illustrators)?;
    sync_group::<EditorRole>(scope, book, data.editors)?;

    if let Some(publisher) = data.publisher {
        book.publisher = sync_single::<Publisher>(
            scope,
            &book.id,
            book.publisher.as_deref(),
            publisher.as_deref(),
            publisher_books,
        )?;
    }
    if let Some(series) = data.series {
        book.series = sync_single::<BookSeries>(
            scope,
            &book.id,
            book.series.as_deref(),
            series.as_deref(),
            series_books,
        )?;
    }

    if let Some(languages) = data.languages {
        book.languages = dedup(&languages);
    }
    if data.isbn.is_some() {
        book.isbn = data.isbn;
    }
    if data.pages.is_some() {
        book.pages = data.pages;
    }
    if data.year.is_some() {
        book.year = data.year;
    }
    if data.cover_type.is_some() {
        book.cover_type = data.cover_type;
    }
    if data.description.is_some() {
        book.description = data.description;
    }
    book.updated_at = now_millis();
    Ok(())
}

fn apply_board_game(game: &mut BoardGame, data: BoardGameUpdate) -> AppResult<()> {
    if data.min_players.is_some() {
        game.min_players = data.min_players;
    }
    if data.max_players.is_some() {
        game.max_players = data.max_players;
    }
    if data.min_age.is_some() {
        game.min_age = data.min_age;
    }
    if data.duration.is_some() {
        game.duration = data.duration;
    }
    if let Some(languages) = data.languages {
        game.languages = dedup(&languages);
    }
    if data.description.is_some() {
        game.description = data.description;
    }
    validate_board_game(game)?;
    game.updated_at = now_millis();
    Ok(())
}

fn board_game_create_as_update(data: BoardGameCreate) -> BoardGameUpdate {
    BoardGameUpdate {
        min_players: data.min_players,
        max_players: data.max_players,
        min_age: data.min_age,
        duration: data.duration,
        languages: Some(data.languages),
        description: data.description,
    }
}

/// Strip `book` from every list that references it and tombstone it
fn remove_book(scope: &mut WriteScope, book: &mut Book) -> AppResult<()> {
    let id = book.id.clone();
    unlink_all::<Contributor<AuthorRole>>(scope, &id, &book.authors, contributor_books::<AuthorRole>)?;
    unlink_all::<Contributor<CompilerRole>>(scope, &id, &book.compilers, contributor_books::<CompilerRole>)?;
    unlink_all::<Contributor<TranslatorRole>>(
        scope,
        &id,
        &book.translators,
        contributor_books::<TranslatorRole>,
    )?;
    unlink_all::<Contributor<IllustratorRole>>(
        scope,
        &id,
        &book.illustrators,
        contributor_books::<IllustratorRole>,
    )?;
    unlink_all::<Contributor<EditorRole>>(scope, &id, &book.editors, contributor_books::<EditorRole>)?;
    if let Some(publisher) = book.publisher.as_ref() {
        unlink_all::<Publisher>(scope, &id, std::slice::from_ref(publisher), publisher_books)?;
    }
    if let Some(series) = book.series.as_ref() {
        unlink_all::<BookSeries>(scope, &id, std::slice::from_ref(series), series_books)?;
    }
    soft_delete(scope, book)
}

fn load_details(scope: &impl Scope, product: &Product) -> AppResult<Option<SpecificProduct>> {
    let Some(specific_id) = product.specific_product.as_deref() else {
        return Ok(None);
    };
    if let Some(book) = scope.find::<Book>(specific_id)? {
        return Ok(Some(SpecificProduct::Book(book)));
    }
    Ok(scope
        .find::<BoardGame>(specific_id)?
        .map(SpecificProduct::BoardGame))
}

impl ProductRepository {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    pub fn find_all(&self, query: &ListQuery) -> AppResult<Vec<Product>> {
        let items = self.store.read()?.list::<Product>()?;
        Ok(paginate(items, query))
    }

    pub fn find_by_id(&self, id: &str) -> AppResult<ProductDetail> {
        let scope = self.store.read()?;
        let product = scope.require::<Product>(id)?;
        let details = load_details(&scope, &product)?;
        Ok(ProductDetail { product, details })
    }

    pub fn find_by_key(&self, key: &str) -> AppResult<ProductDetail> {
        let scope = self.store.read()?;
        let product = scope
            .find_by::<Product>(|p| p.key == key)?
            .ok_or_else(|| AppError::not_found("Product", key).with_detail("key", key))?;
        let details = load_details(&scope, &product)?;
        Ok(ProductDetail { product, details })
    }

    pub fn create(&self, data: ProductCreate) -> AppResult<ProductDetail> {
        let mut checks = Checks::new();
        checks
            .check(validate_required_text(&data.name, "name", MAX_NAME_LEN))
            .ensure(!data.price.is_sign_negative(), "price must not be negative");
        checks.finish()?;
        validate_images(&data.images)?;
        let key = normalize_key(data.key.as_deref().unwrap_or(&data.name))?;

        let mut scope = self.store.write()?;
        let kind = resolve_kind(&scope, &data.product_type)?;
        ensure_unique::<Product>(&scope, None, |p| p.key == key, || key_taken(&key))?;

        let now = now_millis();
        let code = scope.next_counter(PRODUCT_CODE_COUNTER)?;
        let mut product = Product {
            id: new_id(),
            name: data.name.trim().to_string(),
            key,
            code,
            price: data.price,
            quantity: data.quantity.unwrap_or(0),
            product_type: data.product_type.clone(),
            sections: Vec::new(),
            images: dedup(&data.images),
            specific_product: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        product.sections =
            sync_many::<Section>(&mut scope, &product.id, &[], &data.sections, section_products)?;

        let details = match kind {
            ProductKind::Book => {
                if data.board_game.is_some() {
                    return Err(AppError::business_rule(ErrorCode::ProductTypeMismatch));
                }
                let mut book = Book::new(new_id(), product.id.clone());
                let patch = book_create_as_update(data.book.unwrap_or_default());
                apply_book(&mut scope, &mut book, patch)?;
                scope.save(&book)?;
                SpecificProduct::Book(book)
            }
            ProductKind::BoardGame => {
                if data.book.is_some() {
                    return Err(AppError::business_rule(ErrorCode::ProductTypeMismatch));
                }
                let mut game = BoardGame {
                    id: new_id(),
                    product: product.id.clone(),
                    min_players: None,
                    max_players: None,
                    min_age: None,
                    duration: None,
                    languages: Vec::new(),
                    description: None,
                    created_at: now,
                    updated_at: now,
                    deleted_at: None,
                };
                let patch = board_game_create_as_update(data.board_game.unwrap_or_default());
                apply_board_game(&mut game, patch)?;
                scope.save(&game)?;
                SpecificProduct::BoardGame(game)
            }
        };
        product.specific_product = Some(match &details {
            SpecificProduct::Book(b) => b.id.clone(),
            SpecificProduct::BoardGame(g) => g.id.clone(),
        });

        scope.save(&product)?;
        scope.commit()?;

        tracing::info!(
            id = %product.id,
            code = product.code,
            kind = kind.as_str(),
            "Product created"
        );
        Ok(ProductDetail {
            product,
            details: Some(details),
        })
    }

    pub fn update(&self, id: &str, data: ProductUpdate) -> AppResult<ProductDetail> {
        let mut scope = self.store.write()?;
        let mut product = scope.require::<Product>(id)?;
        let kind = resolve_kind(&scope, &product.product_type)?;

        match kind {
            ProductKind::Book if data.board_game.is_some() => {
                return Err(AppError::business_rule(ErrorCode::ProductTypeMismatch));
            }
            ProductKind::BoardGame if data.book.is_some() => {
                return Err(AppError::business_rule(ErrorCode::ProductTypeMismatch));
            }
            _ => {}
        }

        let mut checks = Checks::new();
        if let Some(name) = &data.name {
            checks.check(validate_required_text(name, "name", MAX_NAME_LEN));
        }
        if let Some(price) = &data.price {
            checks.ensure(!price.is_sign_negative(), "price must not be negative");
        }
        checks.finish()?;

        if let Some(name) = data.name {
            product.name = name.trim().to_string();
        }
        if let Some(raw) = data.key {
            let key = normalize_key(&raw)?;
            ensure_unique::<Product>(&scope, Some(id), |p| p.key == key, || key_taken(&key))?;
            product.key = key;
        }
        if let Some(price) = data.price {
            product.price = price;
        }
        if let Some(quantity) = data.quantity {
            product.quantity = quantity;
        }
        if let Some(images) = data.images {
            validate_images(&images)?;
            product.images = dedup(&images);
        }
        if let Some(sections) = data.sections {
            product.sections =
                sync_many::<Section>(&mut scope, id, &product.sections, &sections, section_products)?;
        }

        let specific_id = product.specific_product.clone().unwrap_or_default();
        if let Some(patch) = data.book {
            let mut book = scope.require::<Book>(&specific_id)?;
            apply_book(&mut scope, &mut book, patch)?;
            scope.save(&book)?;
        }
        if let Some(patch) = data.board_game {
            let mut game = scope.require::<BoardGame>(&specific_id)?;
            apply_board_game(&mut game, patch)?;
            scope.save(&game)?;
        }

        product.updated_at = now_millis();
        scope.save(&product)?;
        let details = load_details(&scope, &product)?;
        scope.commit()?;
        Ok(ProductDetail { product, details })
    }

    /// Unlink the product and its specific product everywhere, then tombstone both
    pub fn delete(&self, id: &str) -> AppResult<Product> {
        let mut scope = self.store.write()?;
        let mut product = require_existing::<Product>(&scope, id)?;
        if product.deleted_at.is_some() {
            return Err(AppError::already_removed("Product", id));
        }

        unlink_all::<Section>(&mut scope, id, &product.sections, section_products)?;

        if let Some(specific_id) = product.specific_product.as_deref() {
            if let Some(mut book) = scope.find::<Book>(specific_id)? {
                remove_book(&mut scope, &mut book)?;
            } else if let Some(mut game) = scope.find::<BoardGame>(specific_id)? {
                soft_delete(&mut scope, &mut game)?;
            }
        }

        soft_delete(&mut scope, &mut product)?;
        scope.commit()?;

        tracing::info!(id = %id, "Product deleted");
        Ok(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{
        ContributorRepository, ProductTypeRepository, PublisherRepository, SectionRepository,
    };
    use rust_decimal::Decimal;
    use shared::models::{Author, ContributorCreate, PublisherCreate, SectionCreate};

    struct Fixture {
        store: DocumentStore,
        repo: ProductRepository,
        book_type: String,
        game_type: String,
    }

    fn fixture() -> Fixture {
        let store = DocumentStore::open_in_memory().unwrap();
        let types = ProductTypeRepository::new(store.clone());
        types.ensure_defaults().unwrap();
        let all = types.find_all().unwrap();
        let id_of = |kind| all.iter().find(|t| t.key == kind).unwrap().id.clone();
        Fixture {
            repo: ProductRepository::new(store.clone()),
            book_type: id_of(ProductKind::Book),
            game_type: id_of(ProductKind::BoardGame),
            store,
        }
    }

    fn product(name: &str, product_type: &str) -> ProductCreate {
        ProductCreate {
            name: name.to_string(),
            key: None,
            price: Decimal::new(1250, 2),
            quantity: Some(3),
            product_type: product_type.to_string(),
            sections: vec![],
            images: vec![],
            book: None,
            board_game: None,
        }
    }

    fn author(store: &DocumentStore, name: &str) -> String {
        ContributorRepository::<AuthorRole>::new(store.clone())
            .create(ContributorCreate {
                full_name: name.to_string(),
            })
            .unwrap()
            .id
    }

    #[test]
    fn test_codes_increase_and_keys_are_slugs() {
        let f = fixture();
        let a = f.repo.create(product("War and Peace", &f.book_type)).unwrap();
        let b = f.repo.create(product("Carcassonne", &f.game_type)).unwrap();

        assert_eq!(a.product.key, "war-and-peace");
        assert!(b.product.code > a.product.code);
        assert!(matches!(a.details, Some(SpecificProduct::Book(_))));
        assert!(matches!(b.details, Some(SpecificProduct::BoardGame(_))));

        let err = f.repo.create(product("War  and peace!", &f.book_type)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductKeyExists);
        assert_eq!(f.repo.find_by_key("war-and-peace").unwrap().product.id, a.product.id);
    }

    #[test]
    fn test_book_relations_are_mirrored() {
        let f = fixture();
        let a1 = author(&f.store, "Leo Tolstoy");
        let a2 = author(&f.store, "Aylmer Maude");
        let publisher = PublisherRepository::new(f.store.clone())
            .create(PublisherCreate {
                name: "Folio".to_string(),
            })
            .unwrap();
        let section = SectionRepository::new(f.store.clone())
            .create(SectionCreate {
                name: "Classics".to_string(),
                parent: None,
                products: vec![],
            })
            .unwrap();

        let mut data = product("War and Peace", &f.book_type);
        data.sections = vec![section.id.clone()];
        data.book = Some(BookCreate {
            authors: vec![a1.clone(), a2.clone()],
            publisher: Some(publisher.id.clone()),
            ..Default::default()
        });
        let created = f.repo.create(data).unwrap();
        let book_id = created.product.specific_product.clone().unwrap();

        {
            let read = f.store.read().unwrap();
            assert_eq!(read.require::<Author>(&a1).unwrap().books, vec![book_id.clone()]);
            assert_eq!(read.require::<Publisher>(&publisher.id).unwrap().books, vec![book_id.clone()]);
            assert_eq!(
                read.require::<Section>(&section.id).unwrap().products,
                vec![created.product.id.clone()]
            );
        }

        f.repo
            .update(
                &created.product.id,
                ProductUpdate {
                    book: Some(BookUpdate {
                        authors: Some(vec![a2.clone()]),
                        publisher: Some(None),
                        ..Default::default()
                    }),
                    ..Default::default()
                },
            )
            .unwrap();
        {
            let read = f.store.read().unwrap();
            assert!(read.require::<Author>(&a1).unwrap().books.is_empty());
            assert_eq!(read.require::<Author>(&a2).unwrap().books, vec![book_id.clone()]);
            assert!(read.require::<Publisher>(&publisher.id).unwrap().books.is_empty());
        }

        f.repo.delete(&created.product.id).unwrap();
        let read = f.store.read().unwrap();
        assert!(read.require::<Author>(&a2).unwrap().books.is_empty());
        assert!(read.require::<Section>(&section.id).unwrap().products.is_empty());
        assert!(read.find::<Book>(&book_id).unwrap().is_none());
    }

    #[test]
    fn test_missing_reference_writes_nothing() {
        let f = fixture();
        let a1 = author(&f.store, "Leo Tolstoy");
        let mut data = product("War and Peace", &f.book_type);
        data.book = Some(BookCreate {
            authors: vec![a1.clone()],
            translators: vec!["ghost".to_string()],
            ..Default::default()
        });

        let err = f.repo.create(data).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        let read = f.store.read().unwrap();
        assert!(read.require::<Author>(&a1).unwrap().books.is_empty());
        assert!(read.list::<Product>().unwrap().is_empty());
    }

    #[test]
    fn test_payload_must_match_type() {
        let f = fixture();
        let mut data = product("Catan", &f.game_type);
        data.book = Some(BookCreate::default());
        assert_eq!(
            f.repo.create(data).unwrap_err().code,
            ErrorCode::ProductTypeMismatch
        );

        let mut data = product("Catan", &f.game_type);
        data.board_game = Some(BoardGameCreate {
            min_players: Some(5),
            max_players: Some(2),
            ..Default::default()
        });
        assert_eq!(f.repo.create(data).unwrap_err().code, ErrorCode::ValidationFailed);

        assert_eq!(
            f.repo.create(product("Catan", "unknown")).unwrap_err().code,
            ErrorCode::ProductTypeNotFound
        );
    }
}
