use std::sync::Arc;

use axum_test::TestServer;
use bindery_core::application::{LibraryService, ReadListService};
use bindery_core::database::{CatalogSeed, InMemoryCatalog};
use bindery_model::{Book, Library, LibraryId, ReadList, UserId};
use bindery_server::{
    AppState, create_app,
    infra::{
        app_state::StorageKind,
        config::{ApiKeyConfig, Config},
    },
};

pub const ADMIN_KEY: &str = "admin-key";
pub const READER_KEY: &str = "reader-key";
pub const COMICS_READER_KEY: &str = "comics-reader-key";

// Code is used by test modules, but not in this scope
#[allow(unused)]
#[derive(Debug)]
pub struct TestApp {
    pub server: TestServer,
    pub catalog: InMemoryCatalog,
    pub comics: Library,
    pub manga: Library,
    pub comic_books: Vec<Book>,
    pub manga_books: Vec<Book>,
    pub saga: ReadList,
    pub crossover: ReadList,
}

#[allow(unused)]
pub fn build_test_app() -> TestApp {
    let comics = Library::new("Comics");
    let manga = Library::new("Manga");
    let comic_books: Vec<Book> = (1..=3)
        .map(|n| {
            Book::new(comics.id, format!("Saga #{n}"))
                .with_number(n)
                .with_file_url(format!("/media/comics/saga-{n}.cbz"))
        })
        .collect();
    let manga_books: Vec<Book> = (1..=2)
        .map(|n| {
            Book::new(manga.id, format!("Berserk Vol. {n}"))
                .with_file_url(format!("/media/manga/berserk-{n}.cbz"))
        })
        .collect();

    let saga = ReadList::new("Saga Arc", comic_books.iter().map(|b| b.id).collect());
    let crossover = ReadList::new(
        "Crossover",
        vec![manga_books[0].id, comic_books[0].id, manga_books[1].id],
    );

    let seed = CatalogSeed {
        libraries: vec![comics.clone(), manga.clone()],
        books: comic_books.iter().chain(&manga_books).cloned().collect(),
        read_lists: vec![saga.clone(), crossover.clone()],
    };
    let catalog = InMemoryCatalog::from_seed(seed).expect("seed is valid");

    let mut config = Config::default();
    config.pagination.max_page_size = 50;
    config.api_keys = vec![
        api_key(ADMIN_KEY, true, None),
        api_key(READER_KEY, false, None),
        api_key(COMICS_READER_KEY, false, Some(vec![comics.id])),
    ];

    let shared = Arc::new(catalog.clone());
    let state = AppState::new(
        Arc::new(config),
        ReadListService::new(shared.clone(), shared.clone()),
        LibraryService::new(shared),
        StorageKind::Memory,
    );
    let server = TestServer::new(create_app(state)).expect("test server starts");

    TestApp {
        server,
        catalog,
        comics,
        manga,
        comic_books,
        manga_books,
        saga,
        crossover,
    }
}

fn api_key(key: &str, admin: bool, libraries: Option<Vec<LibraryId>>) -> ApiKeyConfig {
    ApiKeyConfig {
        key: key.to_string(),
        user_id: UserId::new(),
        admin,
        libraries,
    }
}
