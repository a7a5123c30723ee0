use guestlist_core::db::open_db_in_memory;
use guestlist_core::{search_guests, Guest, GuestRepository, SqliteGuestRepository};
use rusqlite::{params, Connection};
use uuid::Uuid;

#[test]
fn substring_matches_last_name() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteGuestRepository::try_new(&conn).unwrap();
    let martin = Guest::new("Martin", "Marie");
    repo.create_guest(&martin).unwrap();
    repo.create_guest(&Guest::new("Durand", "Pierre")).unwrap();

    let hits = search_guests(&conn, "mar").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, martin.id);
}

#[test]
fn substring_matches_first_name_too() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteGuestRepository::try_new(&conn).unwrap();
    repo.create_guest(&Guest::new("Martin", "Marie")).unwrap();
    let pierre = Guest::new("Durand", "Pierre");
    repo.create_guest(&pierre).unwrap();

    let hits = search_guests(&conn, "ierr").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, pierre.id);
}

#[test]
fn matching_is_case_insensitive_and_trims_the_query() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteGuestRepository::try_new(&conn).unwrap();
    let martin = Guest::new("Martin", "Marie");
    repo.create_guest(&martin).unwrap();

    for query in ["MARTIN", "  martin  ", "ArTi"] {
        let hits = search_guests(&conn, query).unwrap();
        assert_eq!(hits.len(), 1, "query `{query}` should match");
        assert_eq!(hits[0].id, martin.id);
    }
}

#[test]
fn blank_query_returns_all_guests_in_store_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteGuestRepository::try_new(&conn).unwrap();

    let guest_a = guest_with_fixed_id("00000000-0000-4000-8000-000000000001", "Bernard", "Sophie");
    let guest_b = guest_with_fixed_id("00000000-0000-4000-8000-000000000002", "Moreau", "Lucas");
    repo.create_guest(&guest_b).unwrap();
    repo.create_guest(&guest_a).unwrap();
    set_created_at(&conn, guest_b.id, 1_000);
    set_created_at(&conn, guest_a.id, 2_000);

    for query in ["", "   ", "\t"] {
        let hits = search_guests(&conn, query).unwrap();
        let ids: Vec<_> = hits.into_iter().map(|guest| guest.id).collect();
        assert_eq!(ids, vec![guest_b.id, guest_a.id]);
    }
}

#[test]
fn like_wildcards_in_the_query_match_literally() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteGuestRepository::try_new(&conn).unwrap();
    let underscored = Guest::new("Smith_Jones", "Alex");
    repo.create_guest(&underscored).unwrap();
    repo.create_guest(&Guest::new("Smithson", "Blake")).unwrap();

    // `_` would match any character if passed through unescaped.
    let hits = search_guests(&conn, "_").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, underscored.id);

    let percent_hits = search_guests(&conn, "%").unwrap();
    assert!(percent_hits.is_empty());
}

#[test]
fn unmatched_query_returns_empty_list() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteGuestRepository::try_new(&conn).unwrap();
    repo.create_guest(&Guest::new("Martin", "Marie")).unwrap();

    let hits = search_guests(&conn, "zzz").unwrap();
    assert!(hits.is_empty());
}

fn guest_with_fixed_id(id: &str, last_name: &str, first_name: &str) -> Guest {
    Guest::with_id(Uuid::parse_str(id).unwrap(), last_name, first_name)
}

fn set_created_at(conn: &Connection, id: Uuid, created_at: i64) {
    conn.execute(
        "UPDATE guests SET created_at = ?1 WHERE uuid = ?2;",
        params![created_at, id.to_string()],
    )
    .unwrap();
}
