//! End-to-end reservation flows through the library façade.

mod common;

use std::thread;

use biblio::{BiblioError, NewBook};

use common::{fast_library, register_active_user};

#[test]
fn test_stock_contention_scenario() {
    let (library, _) = fast_library();
    register_active_user(&library, "u1@example.com");
    register_active_user(&library, "u2@example.com");
    let book = library.add_book(NewBook::new("Dune", "isbn-1", 1)).unwrap();

    // U1 takes the only copy
    let r1 = library.reserve("u1@example.com", book.id).unwrap();
    assert_eq!(library.book(book.id).unwrap().stock, 0);
    assert_eq!(
        library
            .active_reservations_by_user("u1@example.com")
            .unwrap()
            .len(),
        1
    );

    // U2 is out of luck while the copy is out
    assert_eq!(
        library.reserve("u2@example.com", book.id),
        Err(BiblioError::OutOfStock)
    );

    // U1 cancels; the copy is back and the reservation is terminal
    library.cancel(r1.id).unwrap();
    assert_eq!(library.book(book.id).unwrap().stock, 1);
    assert_eq!(library.cancel(r1.id), Err(BiblioError::InvalidState));

    // Now U2 gets the copy
    library.reserve("u2@example.com", book.id).unwrap();
    assert_eq!(library.book(book.id).unwrap().stock, 0);
}

#[test]
fn test_reserve_return_reserve_restores_stock() {
    let (library, _) = fast_library();
    register_active_user(&library, "reader@example.com");
    let book = library.add_book(NewBook::new("Dune", "isbn-1", 3)).unwrap();

    let reservation = library.reserve("reader@example.com", book.id).unwrap();
    library.return_book(reservation.id).unwrap();
    let reservation = library.reserve("reader@example.com", book.id).unwrap();
    library.return_book(reservation.id).unwrap();

    assert_eq!(library.book(book.id).unwrap().stock, 3);
}

#[test]
fn test_simultaneous_reservation_limit() {
    let (library, _) = fast_library();
    register_active_user(&library, "reader@example.com");
    let mut book_ids = Vec::new();
    for i in 0..4 {
        let book = library
            .add_book(NewBook::new(format!("Book {i}"), format!("isbn-{i}"), 1))
            .unwrap();
        book_ids.push(book.id);
    }

    for &book_id in &book_ids[..3] {
        library.reserve("reader@example.com", book_id).unwrap();
    }
    assert_eq!(
        library.reserve("reader@example.com", book_ids[3]),
        Err(BiblioError::ReservationLimitExceeded(3))
    );
}

#[test]
fn test_is_available_tracks_reservations_not_stock() {
    let (library, _) = fast_library();
    register_active_user(&library, "reader@example.com");
    let book = library.add_book(NewBook::new("Dune", "isbn-1", 10)).unwrap();

    assert!(library.is_available(book.id).unwrap());
    let reservation = library.reserve("reader@example.com", book.id).unwrap();
    // Nine copies remain, but the legacy query only looks at reservations
    assert!(!library.is_available(book.id).unwrap());
    library.return_book(reservation.id).unwrap();
    assert!(library.is_available(book.id).unwrap());
}

#[test]
fn test_concurrent_reserves_single_copy() {
    let (library, _) = fast_library();
    for i in 0..8 {
        register_active_user(&library, &format!("u{i}@example.com"));
    }
    let book = library.add_book(NewBook::new("Dune", "isbn-1", 1)).unwrap();

    let results: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let library = &library;
                scope.spawn(move || library.reserve(&format!("u{i}@example.com"), book.id))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one reservation should win the copy");
    assert!(results
        .iter()
        .filter(|r| r.is_err())
        .all(|r| *r == Err(BiblioError::OutOfStock)));

    assert_eq!(library.book(book.id).unwrap().stock, 0);
    assert_eq!(library.reservations_by_book(book.id).unwrap().len(), 1);
}

#[test]
fn test_concurrent_duplicate_reserves_same_user() {
    let (library, _) = fast_library();
    register_active_user(&library, "reader@example.com");
    let book = library.add_book(NewBook::new("Dune", "isbn-1", 10)).unwrap();

    let results: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let library = &library;
                scope.spawn(move || library.reserve("reader@example.com", book.id))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "the duplicate check must hold under contention");
    assert!(results
        .iter()
        .filter(|r| r.is_err())
        .all(|r| *r == Err(BiblioError::DuplicateReservation)));

    // Exactly one unit of stock was consumed
    assert_eq!(library.book(book.id).unwrap().stock, 9);
    assert_eq!(
        library
            .active_reservations_by_user("reader@example.com")
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn test_failed_reserve_leaves_no_partial_state() {
    let (library, _) = fast_library();
    register_active_user(&library, "reader@example.com");
    let book = library.add_book(NewBook::new("Dune", "isbn-1", 1)).unwrap();

    library.reserve("reader@example.com", book.id).unwrap();
    // Out of stock for a second user: no reservation row, no stock change
    register_active_user(&library, "other@example.com");
    assert_eq!(
        library.reserve("other@example.com", book.id),
        Err(BiblioError::OutOfStock)
    );

    assert_eq!(library.book(book.id).unwrap().stock, 0);
    assert_eq!(library.reservations_by_book(book.id).unwrap().len(), 1);
    assert!(library
        .reservations_by_user("other@example.com")
        .unwrap()
        .is_empty());
}
