#![allow(dead_code)]

use std::sync::Arc;

use bindery_core::application::{LibraryService, ReadListService};
use bindery_core::database::{CatalogSeed, InMemoryCatalog};
use bindery_core::domain::{AuthorizationScope, Principal};
use bindery_model::{Book, Library, LibraryId, ReadList, UserId};

/// Two libraries with three books each, and three read lists:
///
/// - "Saga Arc": comics 1..=3
/// - "Crossover": comics 1, manga 1, comics 2
/// - "Manga Picks": manga 2, manga 3
///
/// Books are seeded in reverse, so the store's own order never matches any
/// list's member order.
#[derive(Debug)]
pub struct Fixture {
    pub catalog: InMemoryCatalog,
    pub read_lists: ReadListService,
    pub libraries: LibraryService,
    pub comics: Library,
    pub manga: Library,
    pub comic_books: Vec<Book>,
    pub manga_books: Vec<Book>,
    pub saga: ReadList,
    pub crossover: ReadList,
    pub manga_picks: ReadList,
}

impl Fixture {
    pub fn new() -> Self {
        let comics = Library::new("Comics");
        let manga = Library::new("Manga");

        let comic_books: Vec<Book> = (1..=3)
            .map(|n| {
                Book::new(comics.id, format!("Saga #{n}"))
                    .with_number(n)
                    .with_file_url(format!("/media/comics/saga-{n}.cbz"))
            })
            .collect();
        let manga_books: Vec<Book> = (1..=3)
            .map(|n| {
                Book::new(manga.id, format!("Berserk Vol. {n}"))
                    .with_number(n)
                    .with_file_url(format!("/media/manga/berserk-{n}.cbz"))
            })
            .collect();

        let saga = ReadList::new(
            "Saga Arc",
            comic_books.iter().map(|book| book.id).collect(),
        )
        .with_summary("The first arc");
        let crossover = ReadList::new(
            "Crossover",
            vec![comic_books[0].id, manga_books[0].id, comic_books[1].id],
        );
        let manga_picks = ReadList::new(
            "Manga Picks",
            vec![manga_books[1].id, manga_books[2].id],
        );

        // Books go in backwards so store order never matches list order.
        let mut books: Vec<Book> = comic_books.iter().chain(&manga_books).cloned().collect();
        books.reverse();

        let seed = CatalogSeed {
            libraries: vec![comics.clone(), manga.clone()],
            books,
            read_lists: vec![saga.clone(), crossover.clone(), manga_picks.clone()],
        };
        let catalog = InMemoryCatalog::from_seed(seed).expect("fixture seed is valid");
        let shared = Arc::new(catalog.clone());

        Self {
            read_lists: ReadListService::new(shared.clone(), shared.clone()),
            libraries: LibraryService::new(shared),
            catalog,
            comics,
            manga,
            comic_books,
            manga_books,
            saga,
            crossover,
            manga_picks,
        }
    }

    pub fn admin(&self) -> Principal {
        Principal::admin(UserId::new())
    }

    pub fn unrestricted_reader(&self) -> Principal {
        Principal::reader(UserId::new(), AuthorizationScope::Unrestricted)
    }

    pub fn reader_of(&self, libraries: &[LibraryId]) -> Principal {
        Principal::reader(
            UserId::new(),
            AuthorizationScope::libraries(libraries.iter().copied()),
        )
    }
}
