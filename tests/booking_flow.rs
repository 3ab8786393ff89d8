//! Flujo completo de reservas contra una base de datos real
//!
//! Estos tests necesitan TEST_DATABASE_URL apuntando a un PostgreSQL de
//! pruebas; si la variable no está definida se saltan en silencio. Cada
//! test crea su propia flota con identificadores únicos para poder
//! ejecutarse en paralelo y repetidamente.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use bus_booking::controllers::{BookingController, BusController};
use bus_booking::dto::{CreateBookingRequest, CreateBusRequest, PassengerInput, SeatAvailabilityQuery};
use bus_booking::models::{Bus, CancellationOutcome, Route, Seat, User};
use bus_booking::repositories::{
    BookingRepository, BusRepository, RouteRepository, SeatRepository, UserRepository,
};
use bus_booking::utils::errors::AppError;

async fn test_pool() -> Option<PgPool> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("no se pudo conectar a TEST_DATABASE_URL");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("error aplicando migraciones");
    Some(pool)
}

fn unique_tag() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    // Nanosegundos para que dos fixtures del mismo test no colisionen
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos() as i64
}

async fn create_user(pool: &PgPool, name: &str) -> User {
    let repo = UserRepository::new(pool.clone());
    repo.create(
        name,
        &format!("{}-{}@example.com", name.to_lowercase().replace(' ', "."), unique_tag()),
        "$2b$12$hash-de-prueba",
        "customer",
    )
    .await
    .expect("error creando usuario")
}

async fn create_fleet(pool: &PgPool, total_seats: i32) -> (Bus, Route, Vec<Seat>) {
    let bus_repo = BusRepository::new(pool.clone());
    let route_repo = RouteRepository::new(pool.clone());
    let seat_repo = SeatRepository::new(pool.clone());

    let request = CreateBusRequest {
        bus_name: "Expreso de prueba".to_string(),
        bus_number: format!("T-{}", unique_tag() % 10_000_000_000_000),
        bus_type: "ac".to_string(),
        fare: Decimal::new(4500, 2),
        total_seats,
    };

    let bus = bus_repo
        .create_with_seats(&request)
        .await
        .expect("error creando bus");

    let route = route_repo
        .create(
            bus.id,
            "Madrid",
            "Valencia",
            chrono::NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            chrono::NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
        )
        .await
        .expect("error creando ruta");

    let seats = seat_repo
        .seats_for_bus(bus.id)
        .await
        .expect("error listando asientos");
    assert_eq!(seats.len() as i32, total_seats);

    (bus, route, seats)
}

fn booking_request(
    user: &User,
    bus: &Bus,
    route: &Route,
    date: &str,
    seat_ids: Vec<i32>,
) -> CreateBookingRequest {
    let passengers = seat_ids
        .iter()
        .enumerate()
        .map(|(i, _)| PassengerInput {
            full_name: format!("Pasajero {}", i + 1),
            age: 30,
            gender: "female".to_string(),
        })
        .collect();

    CreateBookingRequest {
        user_id: user.id,
        bus_id: bus.id,
        route_id: route.id,
        travel_date: date.to_string(),
        total_fare: Decimal::new(4500, 2),
        seat_ids,
        passengers,
    }
}

fn seat_by_number<'a>(seats: &'a [Seat], number: &str) -> &'a Seat {
    seats
        .iter()
        .find(|s| s.seat_number == number)
        .expect("asiento no encontrado")
}

#[tokio::test]
async fn test_flujo_completo_de_reserva() {
    let pool = match test_pool().await {
        Some(pool) => pool,
        None => {
            eprintln!("TEST_DATABASE_URL no definida, test saltado");
            return;
        }
    };

    let (bus, route, seats) = create_fleet(&pool, 3).await;
    let ana = create_user(&pool, "Ana Perez").await;
    let luis = create_user(&pool, "Luis Gomez").await;

    let controller = BookingController::new(pool.clone());
    let seat_repo = SeatRepository::new(pool.clone());
    let booking_repo = BookingRepository::new(pool.clone());
    let travel_date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();

    let seat_one = seat_by_number(&seats, "1");
    let seat_two = seat_by_number(&seats, "2");
    let seat_three = seat_by_number(&seats, "3");

    // Ana reserva los asientos 1 y 2
    let created = controller
        .create(booking_request(&ana, &bus, &route, "2025-06-01", vec![seat_one.id, seat_two.id]))
        .await
        .expect("la primera reserva debe confirmarse")
        .data
        .unwrap();

    assert!(created.booking_id > 0);
    assert_eq!(created.status, "Confirmed");
    assert_eq!(created.seat_numbers, vec!["1", "2"]);

    // Luis pide 2 y 3: el conflicto lista exactamente el asiento 2, el 3
    // sigue libre
    let conflict = controller
        .create(booking_request(&luis, &bus, &route, "2025-06-01", vec![seat_two.id, seat_three.id]))
        .await;

    match conflict {
        Err(AppError::SeatsUnavailable(numbers)) => {
            assert_eq!(numbers, vec!["2".to_string()]);
        }
        other => panic!("se esperaba SeatsUnavailable, se obtuvo {:?}", other.map(|r| r.success)),
    }

    // La reserva rechazada no dejó ninguna fila detrás
    let luis_history = booking_repo.bookings_for_user(luis.id).await.unwrap();
    assert!(luis_history.is_empty());

    let occupied = seat_repo
        .occupied_seat_ids(bus.id, travel_date)
        .await
        .unwrap();
    assert_eq!(occupied.len(), 2);

    // La proyección de disponibilidad solo ofrece el asiento 3
    let bus_controller = BusController::new(pool.clone());
    let availability = bus_controller
        .available_seats(bus.id, SeatAvailabilityQuery { date: "2025-06-01".to_string() })
        .await
        .unwrap()
        .data
        .unwrap();
    assert_eq!(availability.total_seats, 3);
    assert_eq!(availability.booked_seats, 2);
    let free: Vec<&str> = availability
        .available_seats
        .iter()
        .map(|s| s.seat_number.as_str())
        .collect();
    assert_eq!(free, vec!["3"]);

    // Cancelar libera los asientos en la misma operación
    let outcome = booking_repo.cancel_booking(created.booking_id).await.unwrap();
    match outcome {
        CancellationOutcome::Cancelled(booking) => {
            assert!(booking.is_cancelled());
            assert!(!booking.is_active);
        }
        CancellationOutcome::AlreadyCancelled(_) => panic!("la reserva no estaba cancelada"),
    }

    let occupied = seat_repo
        .occupied_seat_ids(bus.id, travel_date)
        .await
        .unwrap();
    assert!(occupied.is_empty());

    // Cancelar de nuevo es un no-op, no un error
    let outcome = booking_repo.cancel_booking(created.booking_id).await.unwrap();
    assert!(matches!(outcome, CancellationOutcome::AlreadyCancelled(_)));

    // Con los asientos liberados, la petición de Luis ya entra completa
    let rebooked = controller
        .create(booking_request(&luis, &bus, &route, "2025-06-01", vec![seat_two.id, seat_three.id]))
        .await
        .expect("la reserva tras cancelar debe confirmarse")
        .data
        .unwrap();
    assert_eq!(rebooked.seat_numbers, vec!["2", "3"]);

    // Historial: Ana conserva su reserva cancelada, Luis ve la suya activa
    let ana_history = booking_repo.bookings_for_user(ana.id).await.unwrap();
    assert_eq!(ana_history.len(), 1);
    assert!(ana_history[0].status.eq_ignore_ascii_case("cancelled"));

    let luis_history = booking_repo.bookings_for_user(luis.id).await.unwrap();
    assert_eq!(luis_history.len(), 1);
    assert_eq!(luis_history[0].seat_numbers, vec!["2", "3"]);
    assert_eq!(luis_history[0].origin, "Madrid");
    assert_eq!(luis_history[0].passengers.len(), 2);

    // Detalle de billete con los datos del titular
    let ticket = booking_repo
        .ticket_detail(rebooked.booking_id)
        .await
        .unwrap()
        .expect("el billete debe existir");
    assert_eq!(ticket.user_name, "Luis Gomez");
    assert_eq!(ticket.seat_numbers, vec!["2", "3"]);
    assert_eq!(ticket.bus_number, bus.bus_number);
}

#[tokio::test]
async fn test_reservas_en_fechas_distintas_no_chocan() {
    let pool = match test_pool().await {
        Some(pool) => pool,
        None => {
            eprintln!("TEST_DATABASE_URL no definida, test saltado");
            return;
        }
    };

    let (bus, route, seats) = create_fleet(&pool, 2).await;
    let user = create_user(&pool, "Marta Ruiz").await;
    let controller = BookingController::new(pool.clone());

    let seat_one = seat_by_number(&seats, "1");

    controller
        .create(booking_request(&user, &bus, &route, "2025-06-01", vec![seat_one.id]))
        .await
        .expect("reserva del día 1");

    // El mismo asiento en otra fecha es inventario independiente
    controller
        .create(booking_request(&user, &bus, &route, "2025-06-02", vec![seat_one.id]))
        .await
        .expect("reserva del día 2");
}

#[tokio::test]
async fn test_reservas_concurrentes_sobre_el_mismo_asiento() {
    let pool = match test_pool().await {
        Some(pool) => pool,
        None => {
            eprintln!("TEST_DATABASE_URL no definida, test saltado");
            return;
        }
    };

    let (bus, route, seats) = create_fleet(&pool, 4).await;
    let ana = create_user(&pool, "Ana Sanchez").await;
    let luis = create_user(&pool, "Luis Ortega").await;

    let controller_a = BookingController::new(pool.clone());
    let controller_b = BookingController::new(pool.clone());

    // Ambas reservas comparten el asiento 2; solo una puede ganar
    let seat_two = seat_by_number(&seats, "2");
    let request_a = booking_request(&ana, &bus, &route, "2025-07-10", vec![seats[0].id, seat_two.id]);
    let request_b = booking_request(&luis, &bus, &route, "2025-07-10", vec![seat_two.id, seats[2].id]);

    let (result_a, result_b) = tokio::join!(
        controller_a.create(request_a),
        controller_b.create(request_b)
    );

    let successes = result_a.is_ok() as u8 + result_b.is_ok() as u8;
    assert_eq!(successes, 1, "exactamente una reserva debe confirmarse");

    let loser = if result_a.is_err() { result_a } else { result_b };
    match loser {
        Err(AppError::SeatsUnavailable(numbers)) => {
            assert!(numbers.contains(&"2".to_string()));
        }
        _ => panic!("el perdedor debe recibir SeatsUnavailable"),
    }

    // Tras la carrera el asiento queda ocupado exactamente una vez
    let seat_repo = SeatRepository::new(pool.clone());
    let occupied = seat_repo
        .occupied_seat_ids(bus.id, NaiveDate::from_ymd_opt(2025, 7, 10).unwrap())
        .await
        .unwrap();
    assert!(occupied.contains(&seat_two.id));
}

#[tokio::test]
async fn test_asientos_de_otro_bus_son_peticion_invalida() {
    let pool = match test_pool().await {
        Some(pool) => pool,
        None => {
            eprintln!("TEST_DATABASE_URL no definida, test saltado");
            return;
        }
    };

    let (bus_a, route_a, _seats_a) = create_fleet(&pool, 2).await;
    let (_bus_b, _route_b, seats_b) = create_fleet(&pool, 2).await;
    let user = create_user(&pool, "Pedro Lopez").await;

    let controller = BookingController::new(pool.clone());

    // Un id de asiento de otro bus no es un conflicto de disponibilidad
    let result = controller
        .create(booking_request(&user, &bus_a, &route_a, "2025-06-01", vec![seats_b[0].id]))
        .await;

    assert!(matches!(result, Err(AppError::ValidationError(_))));
}

#[tokio::test]
async fn test_cancelar_reserva_inexistente_devuelve_not_found() {
    let pool = match test_pool().await {
        Some(pool) => pool,
        None => {
            eprintln!("TEST_DATABASE_URL no definida, test saltado");
            return;
        }
    };

    let booking_repo = BookingRepository::new(pool.clone());
    let result = booking_repo.cancel_booking(999_999_999).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}
