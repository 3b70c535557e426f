mod support;

use std::collections::BTreeSet;

use anyhow::Result;
use bindery_core::CatalogError;
use bindery_core::application::{
    CreateReadListCommand, ListReadListsOptions, UpdateReadListCommand,
};
use bindery_core::database::ports::ReadListRepository;
use bindery_model::{BookId, PageRequest, ReadListId, Sort, SortField, SortOrder};
use support::Fixture;
use tokio::task::JoinHandle;

fn names(page: &bindery_model::Page<bindery_model::ReadList>) -> Vec<&str> {
    page.content.iter().map(|list| list.name.as_str()).collect()
}

#[tokio::test]
async fn members_come_back_in_position_order() -> Result<()> {
    let fx = Fixture::new();

    let page = fx
        .read_lists
        .list_members(&fx.admin(), fx.saga.id, PageRequest::unpaged())
        .await?;

    let ids: Vec<BookId> = page.content.iter().map(|m| m.book.id).collect();
    let positions: Vec<u32> = page.content.iter().map(|m| m.position).collect();
    assert_eq!(ids, fx.saga.book_ids);
    assert_eq!(positions, vec![0, 1, 2]);
    assert_eq!(page.total_elements, 3);
    assert_eq!(page.total_pages, 1);
    Ok(())
}

#[tokio::test]
async fn member_pages_slice_the_position_order() -> Result<()> {
    let fx = Fixture::new();

    let second = fx
        .read_lists
        .list_members(&fx.admin(), fx.saga.id, PageRequest::of(1, 2))
        .await?;

    assert_eq!(second.content.len(), 1);
    assert_eq!(second.content[0].position, 2);
    assert_eq!(second.content[0].book.id, fx.comic_books[2].id);
    assert!(second.last);
    assert!(!second.first);
    Ok(())
}

#[tokio::test]
async fn restricted_listing_only_returns_lists_touching_permitted_libraries() -> Result<()> {
    let fx = Fixture::new();
    let reader = fx.reader_of(&[fx.comics.id]);

    let page = fx
        .read_lists
        .list_read_lists(&reader, ListReadListsOptions::default())
        .await?;

    assert_eq!(names(&page), vec!["Crossover", "Saga Arc"]);
    assert_eq!(page.total_elements, 2);
    Ok(())
}

#[tokio::test]
async fn restricted_views_hide_out_of_scope_members() -> Result<()> {
    let fx = Fixture::new();
    let reader = fx.reader_of(&[fx.comics.id]);

    let crossover = fx.read_lists.get_read_list(&reader, fx.crossover.id).await?;
    assert!(crossover.filtered);
    assert_eq!(
        crossover.book_ids,
        vec![fx.comic_books[0].id, fx.comic_books[1].id]
    );

    let saga = fx.read_lists.get_read_list(&reader, fx.saga.id).await?;
    assert!(!saga.filtered);

    let members = fx
        .read_lists
        .list_members(&reader, fx.crossover.id, PageRequest::unpaged())
        .await?;
    let positions: Vec<u32> = members.content.iter().map(|m| m.position).collect();
    assert_eq!(positions, vec![0, 2]);
    Ok(())
}

#[tokio::test]
async fn disjoint_library_filter_yields_an_empty_page() -> Result<()> {
    let fx = Fixture::new();
    let reader = fx.reader_of(&[fx.comics.id]);

    let page = fx
        .read_lists
        .list_read_lists(
            &reader,
            ListReadListsOptions {
                library_ids: Some(BTreeSet::from([fx.manga.id])),
                ..Default::default()
            },
        )
        .await?;

    assert!(page.empty);
    assert_eq!(page.total_elements, 0);
    assert_eq!(page.total_pages, 0);
    Ok(())
}

#[tokio::test]
async fn unrestricted_filter_is_used_verbatim() -> Result<()> {
    let fx = Fixture::new();

    let page = fx
        .read_lists
        .list_read_lists(
            &fx.unrestricted_reader(),
            ListReadListsOptions {
                library_ids: Some(BTreeSet::from([fx.manga.id])),
                ..Default::default()
            },
        )
        .await?;

    assert_eq!(names(&page), vec!["Crossover", "Manga Picks"]);
    Ok(())
}

#[tokio::test]
async fn empty_library_filter_means_no_filter() -> Result<()> {
    let fx = Fixture::new();

    let page = fx
        .read_lists
        .list_read_lists(
            &fx.admin(),
            ListReadListsOptions {
                library_ids: Some(BTreeSet::new()),
                ..Default::default()
            },
        )
        .await?;

    assert_eq!(page.total_elements, 3);
    Ok(())
}

#[tokio::test]
async fn search_matches_names_case_insensitively() -> Result<()> {
    let fx = Fixture::new();

    let page = fx
        .read_lists
        .list_read_lists(
            &fx.admin(),
            ListReadListsOptions {
                search: Some("  saga ".to_string()),
                ..Default::default()
            },
        )
        .await?;

    assert_eq!(names(&page), vec!["Saga Arc"]);
    Ok(())
}

#[tokio::test]
async fn listings_ignore_requested_sort() -> Result<()> {
    let fx = Fixture::new();

    let page = fx
        .read_lists
        .list_read_lists(
            &fx.admin(),
            ListReadListsOptions {
                page: PageRequest::unpaged().with_sort(Sort {
                    field: SortField::CreatedAt,
                    order: SortOrder::Descending,
                }),
                ..Default::default()
            },
        )
        .await?;

    assert_eq!(names(&page), vec!["Crossover", "Manga Picks", "Saga Arc"]);
    Ok(())
}

#[tokio::test]
async fn pages_of_two_over_five_lists() -> Result<()> {
    let fx = Fixture::new();
    let admin = fx.admin();
    for name in ["Alpha", "Omega"] {
        fx.read_lists
            .create_read_list(
                &admin,
                CreateReadListCommand {
                    name: name.to_string(),
                    ..Default::default()
                },
            )
            .await?;
    }

    let mut sizes = Vec::new();
    for number in 0..3 {
        let page = fx
            .read_lists
            .list_read_lists(
                &admin,
                ListReadListsOptions {
                    page: PageRequest::of(number, 2),
                    ..Default::default()
                },
            )
            .await?;
        assert_eq!(page.total_elements, 5);
        assert_eq!(page.total_pages, 3);
        sizes.push(page.content.len());
    }

    assert_eq!(sizes, vec![2, 2, 1]);
    Ok(())
}

#[tokio::test]
async fn oversized_and_zero_pages_are_rejected() {
    let fx = Fixture::new();
    let service = fx.read_lists.clone().with_max_page_size(10);

    for page in [PageRequest::of(0, 0), PageRequest::of(0, 11)] {
        let err = service
            .list_read_lists(
                &fx.admin(),
                ListReadListsOptions {
                    page,
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidRequest(_)), "{err:?}");
    }
}

#[tokio::test]
async fn out_of_scope_read_list_is_not_found() {
    let fx = Fixture::new();
    let reader = fx.reader_of(&[fx.comics.id]);

    let err = fx
        .read_lists
        .get_read_list(&reader, fx.manga_picks.id)
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(_)));

    let err = fx
        .read_lists
        .list_members(&reader, fx.manga_picks.id, PageRequest::unpaged())
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(_)));
}

#[tokio::test]
async fn deleted_books_drop_out_of_member_listings() -> Result<()> {
    let fx = Fixture::new();
    fx.catalog.remove_book(fx.comic_books[1].id).await;

    let page = fx
        .read_lists
        .list_members(&fx.admin(), fx.saga.id, PageRequest::unpaged())
        .await?;

    let positions: Vec<u32> = page.content.iter().map(|m| m.position).collect();
    assert_eq!(positions, vec![0, 2]);
    assert_eq!(page.total_elements, 2);
    Ok(())
}

#[tokio::test]
async fn file_urls_are_only_shown_to_admins() -> Result<()> {
    let fx = Fixture::new();

    let as_admin = fx
        .read_lists
        .list_members(&fx.admin(), fx.saga.id, PageRequest::unpaged())
        .await?;
    assert!(as_admin.content.iter().all(|m| m.book.file_url.is_some()));

    let as_reader = fx
        .read_lists
        .list_members(&fx.unrestricted_reader(), fx.saga.id, PageRequest::unpaged())
        .await?;
    assert!(as_reader.content.iter().all(|m| m.book.file_url.is_none()));
    assert_eq!(as_reader.content[0].book.title, "Saga #1");
    Ok(())
}

#[tokio::test]
async fn create_assigns_dense_positions_in_given_order() -> Result<()> {
    let fx = Fixture::new();
    let admin = fx.admin();
    let order = vec![fx.manga_books[2].id, fx.comic_books[0].id, fx.manga_books[0].id];

    let created = fx
        .read_lists
        .create_read_list(
            &admin,
            CreateReadListCommand {
                name: "  Mixed Bag ".to_string(),
                summary: Some("odds and ends".to_string()),
                book_ids: order.clone(),
            },
        )
        .await?;
    assert_eq!(created.name, "Mixed Bag");
    assert_eq!(created.summary, "odds and ends");

    let members = fx
        .read_lists
        .list_members(&admin, created.id, PageRequest::unpaged())
        .await?;
    let ids: Vec<BookId> = members.content.iter().map(|m| m.book.id).collect();
    assert_eq!(ids, order);
    Ok(())
}

#[tokio::test]
async fn duplicate_names_conflict_only_on_exact_match() -> Result<()> {
    let fx = Fixture::new();
    let admin = fx.admin();
    let command = |name: &str| CreateReadListCommand {
        name: name.to_string(),
        ..Default::default()
    };

    fx.read_lists.create_read_list(&admin, command("X")).await?;
    let err = fx
        .read_lists
        .create_read_list(&admin, command("X"))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::DuplicateName { ref name } if name == "X"));

    fx.read_lists.create_read_list(&admin, command("x")).await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_creates_with_one_name_admit_a_single_winner() -> Result<()> {
    let fx = Fixture::new();
    let before = fx.catalog.read_list_count().await;

    let mut handles: Vec<JoinHandle<bindery_core::Result<bindery_model::ReadList>>> = Vec::new();
    for _ in 0..64 {
        let service = fx.read_lists.clone();
        let admin = fx.admin();
        handles.push(tokio::spawn(async move {
            service
                .create_read_list(
                    &admin,
                    CreateReadListCommand {
                        name: "Race".to_string(),
                        ..Default::default()
                    },
                )
                .await
        }));
    }

    let (mut created, mut conflicts) = (0, 0);
    for handle in handles {
        match handle.await? {
            Ok(_) => created += 1,
            Err(CatalogError::DuplicateName { name }) if name == "Race" => conflicts += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(conflicts, 63);
    assert_eq!(fx.catalog.read_list_count().await, before + 1);
    Ok(())
}

#[tokio::test]
async fn renaming_onto_an_existing_name_conflicts() {
    let fx = Fixture::new();

    let err = fx
        .read_lists
        .update_read_list(
            &fx.admin(),
            fx.crossover.id,
            UpdateReadListCommand {
                name: Some("Saga Arc".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::DuplicateName { .. }));
}

#[tokio::test]
async fn duplicate_book_ids_are_rejected() {
    let fx = Fixture::new();
    let book = fx.comic_books[0].id;

    let err = fx
        .read_lists
        .create_read_list(
            &fx.admin(),
            CreateReadListCommand {
                name: "Twice".to_string(),
                summary: None,
                book_ids: vec![book, fx.comic_books[1].id, book],
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::InvalidRequest(_)));
    assert_eq!(fx.catalog.read_list_count().await, 3);
}

#[tokio::test]
async fn blank_names_are_rejected() {
    let fx = Fixture::new();

    let err = fx
        .read_lists
        .create_read_list(
            &fx.admin(),
            CreateReadListCommand {
                name: "   ".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::InvalidRequest(_)));
}

#[tokio::test]
async fn mutations_require_an_admin() {
    let fx = Fixture::new();
    let reader = fx.unrestricted_reader();

    let create = fx
        .read_lists
        .create_read_list(
            &reader,
            CreateReadListCommand {
                name: "Nope".to_string(),
                ..Default::default()
            },
        )
        .await;
    let update = fx
        .read_lists
        .update_read_list(&reader, fx.saga.id, UpdateReadListCommand::default())
        .await;
    let delete = fx.read_lists.delete_read_list(&reader, fx.saga.id).await;

    for result in [create.map(|_| ()), update, delete] {
        assert!(matches!(result, Err(CatalogError::Forbidden(_))));
    }
    assert_eq!(fx.catalog.read_list_count().await, 3);
}

#[tokio::test]
async fn empty_update_leaves_the_read_list_untouched() -> Result<()> {
    let fx = Fixture::new();
    let before = fx.catalog.find_by_id(fx.saga.id).await?;

    fx.read_lists
        .update_read_list(&fx.admin(), fx.saga.id, UpdateReadListCommand::default())
        .await?;

    let after = fx.catalog.find_by_id(fx.saga.id).await?;
    assert_eq!(before, after);
    Ok(())
}

#[tokio::test]
async fn empty_update_of_missing_read_list_is_not_found() {
    let fx = Fixture::new();

    let err = fx
        .read_lists
        .update_read_list(&fx.admin(), ReadListId::new(), UpdateReadListCommand::default())
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(_)));
}

#[tokio::test]
async fn update_replaces_members_and_keeps_other_fields() -> Result<()> {
    let fx = Fixture::new();
    let admin = fx.admin();
    let reordered = vec![fx.comic_books[2].id, fx.comic_books[0].id];

    fx.read_lists
        .update_read_list(
            &admin,
            fx.saga.id,
            UpdateReadListCommand {
                book_ids: Some(reordered.clone()),
                ..Default::default()
            },
        )
        .await?;

    let updated = fx.read_lists.get_read_list(&admin, fx.saga.id).await?;
    assert_eq!(updated.name, "Saga Arc");
    assert_eq!(updated.summary, "The first arc");
    assert_eq!(updated.book_ids, reordered);
    assert!(updated.last_modified_at >= fx.saga.last_modified_at);
    Ok(())
}

#[tokio::test]
async fn deleted_read_list_is_gone() -> Result<()> {
    let fx = Fixture::new();
    let admin = fx.admin();

    fx.read_lists.delete_read_list(&admin, fx.saga.id).await?;

    let err = fx
        .read_lists
        .get_read_list(&admin, fx.saga.id)
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(_)));

    let err = fx
        .read_lists
        .delete_read_list(&admin, fx.saga.id)
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(_)));
    Ok(())
}

#[tokio::test]
async fn libraries_are_scoped_to_the_caller() -> Result<()> {
    let fx = Fixture::new();
    let reader = fx.reader_of(&[fx.manga.id]);

    let visible = fx.libraries.list_libraries(&reader).await?;
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, fx.manga.id);

    let err = fx
        .libraries
        .get_library(&reader, fx.comics.id)
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(_)));

    let all = fx.libraries.list_libraries(&fx.admin()).await?;
    let names: Vec<&str> = all.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["Comics", "Manga"]);
    Ok(())
}
