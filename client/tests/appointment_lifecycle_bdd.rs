//! Behaviour tests for booking, approving, finishing, and cancelling citas.
//!
//! The controllers run against an in-memory clinic API so the scenarios can
//! observe what the server received as well as what the screens show.
#![allow(
    non_snake_case,
    reason = "rstest-bdd generates guard variables with double underscores"
)]

#[expect(
    dead_code,
    reason = "shared doubles include helpers only the other suite uses"
)]
mod support;

use clinica_client::domain::{BookingRequest, CitaId, CitaStatus, Reschedule, SpecialtyId};
use clinica_client::inbound::Toast;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

use support::world::{SharedWorld, WorldFixture};
use support::{SLOT_TAKEN, day, hour, user_id};

#[fixture]
fn world() -> WorldFixture {
    support::world::world()
}

fn record_toast(world: &SharedWorld, toast: Toast) {
    world.borrow_mut().last_toast = Some(toast);
}

fn book(world: &SharedWorld, time: u8) {
    let toast = {
        let mut ctx = world.borrow_mut();
        let calendar = ctx.app.calendar();
        ctx.block_on(async {
            calendar.load().await.expect("calendar loads");
            calendar.open_form(day(10)).await;
            calendar.pick_doctor(&user_id("d1")).await;
        });
        let request = BookingRequest {
            date: day(10),
            time: hour(time),
            specialty: SpecialtyId::new("s1").expect("valid specialty id"),
            doctor: user_id("d1"),
            patient: None,
        };
        let toast = ctx.block_on(calendar.book(request));
        ctx.calendar = Some(calendar);
        toast
    };
    record_toast(world, toast);
}

fn find_listed(world: &SharedWorld, id: &str) -> clinica_client::domain::Cita {
    let mut ctx = world.borrow_mut();
    let citas = ctx.app.citas();
    ctx.block_on(citas.refresh()).expect("cita list loads");
    let cita = citas
        .find(&CitaId::new(id).expect("valid cita id"))
        .expect("cita is listed");
    ctx.citas = Some(citas);
    cita
}

#[given("a clinic with doctor d1, assistant a1 and patients p1 and p2")]
fn a_clinic_with_accounts(world: &WorldFixture) {
    world.world().borrow().seed_accounts();
}

#[given("patient p2 holds 10:00 on July 10 with doctor d1")]
fn patient_p2_holds_ten(world: &WorldFixture) {
    world
        .world()
        .borrow()
        .clinic
        .add_cita("c0", "p2", day(10), hour(10), CitaStatus::Aprobado);
}

#[given("the occupied hours lookup lags behind")]
fn the_occupied_hours_lookup_lags_behind(world: &WorldFixture) {
    world.world().borrow().clinic.lag_hour_lookups();
}

#[given("a pendiente cita c1 at 9:00 on July 10 for patient p1")]
fn a_pendiente_cita(world: &WorldFixture) {
    world
        .world()
        .borrow()
        .clinic
        .add_cita("c1", "p1", day(10), hour(9), CitaStatus::Pendiente);
}

#[given("an approved cita c1 at 9:00 on July 10 for patient p1")]
fn an_approved_cita(world: &WorldFixture) {
    world
        .world()
        .borrow()
        .clinic
        .add_cita("c1", "p1", day(10), hour(9), CitaStatus::Aprobado);
}

#[given("patient p1 is logged in")]
fn patient_p1_is_logged_in(world: &WorldFixture) {
    world.world().borrow().log_in_with_default_password("p1");
}

#[given("assistant a1 is logged in")]
fn assistant_a1_is_logged_in(world: &WorldFixture) {
    world.world().borrow().log_in_with_default_password("a1");
}

#[given("doctor d1 is logged in")]
fn doctor_d1_is_logged_in(world: &WorldFixture) {
    world.world().borrow().log_in_with_default_password("d1");
}

#[when("patient p1 books 10:00 on July 10 with doctor d1")]
fn patient_books_taken_hour(world: &WorldFixture) {
    book(&world.world(), 10);
}

#[when("patient p1 books 11:00 on July 10 with doctor d1")]
fn patient_books_free_hour(world: &WorldFixture) {
    book(&world.world(), 11);
}

#[when("the assistant approves c1 moving it to 15:00 on July 12")]
fn the_assistant_approves_with_reschedule(world: &WorldFixture) {
    let world = world.world();
    let cita = find_listed(&world, "c1");
    let toast = {
        let ctx = world.borrow();
        let citas = ctx.citas.as_ref().expect("cita list open");
        let target = Reschedule {
            date: day(12),
            time: hour(15),
        };
        ctx.block_on(citas.approve(&cita, Some(target)))
    };
    record_toast(&world, toast);
}

#[when("patient p1 cancels c1 giving dolor as the reason")]
fn the_patient_cancels_with_reason(world: &WorldFixture) {
    let world = world.world();
    let cita = find_listed(&world, "c1");
    let toast = {
        let mut ctx = world.borrow_mut();
        let detail = ctx.app.cita_detail(cita);
        let toast = ctx.block_on(detail.cancel("dolor"));
        ctx.detail = Some(detail);
        toast
    };
    record_toast(&world, toast);
}

#[when("the doctor finishes c1")]
fn the_doctor_finishes(world: &WorldFixture) {
    let world = world.world();
    let cita = find_listed(&world, "c1");
    let toast = {
        let ctx = world.borrow();
        let citas = ctx.citas.as_ref().expect("cita list open");
        ctx.block_on(citas.finish(&cita))
    };
    record_toast(&world, toast);
}

#[then("the toast shows the server message for a taken hour")]
fn the_toast_shows_the_taken_hour_message(world: &WorldFixture) {
    let world = world.world();
    let ctx = world.borrow();
    assert_eq!(ctx.last_toast, Some(Toast::error(SLOT_TAKEN)));
}

#[then("a success toast is shown")]
fn a_success_toast_is_shown(world: &WorldFixture) {
    let world = world.world();
    let ctx = world.borrow();
    let toast = ctx.last_toast.as_ref().expect("a toast was shown");
    assert!(!toast.is_error(), "unexpected error toast: {toast}");
}

#[then("the booking form stays open")]
fn the_booking_form_stays_open(world: &WorldFixture) {
    let world = world.world();
    let ctx = world.borrow();
    let calendar = ctx.calendar.as_ref().expect("calendar open");
    let view = calendar.view().snapshot();
    assert!(view.form_open);
    assert_eq!(view.selected, Some(day(10)));
}

#[then("the booking form is closed")]
fn the_booking_form_is_closed(world: &WorldFixture) {
    let world = world.world();
    let ctx = world.borrow();
    let calendar = ctx.calendar.as_ref().expect("calendar open");
    assert!(!calendar.view().snapshot().form_open);
}

#[then("no new cita was created")]
fn no_new_cita_was_created(world: &WorldFixture) {
    let world = world.world();
    let ctx = world.borrow();
    let ids: Vec<String> = ctx
        .clinic
        .citas()
        .iter()
        .map(|cita| cita.id().to_string())
        .collect();
    assert_eq!(ids, vec!["c0".to_owned()]);
}

#[then("the clinic holds a pendiente cita for patient p1 at 11:00 on July 10")]
fn the_clinic_holds_the_new_cita(world: &WorldFixture) {
    let world = world.world();
    let ctx = world.borrow();
    let booked = ctx
        .clinic
        .citas()
        .into_iter()
        .find(|cita| cita.patient().id == user_id("p1"))
        .expect("cita booked for p1");
    assert_eq!(booked.status(), CitaStatus::Pendiente);
    assert_eq!((booked.date(), booked.time()), (day(10), hour(11)));
}

#[then("cita c1 is aprobado at 15:00 on July 12")]
fn cita_c1_is_moved(world: &WorldFixture) {
    let world = world.world();
    let ctx = world.borrow();
    let cita = ctx.clinic.cita("c1").expect("c1 exists");
    assert_eq!(cita.status(), CitaStatus::Aprobado);
    assert_eq!((cita.date(), cita.time()), (day(12), hour(15)));
}

#[then("the occupied hours shown for July 12 include 15:00")]
fn the_occupied_hours_include_the_new_slot(world: &WorldFixture) {
    let world = world.world();
    let ctx = world.borrow();
    let citas = ctx.citas.as_ref().expect("cita list open");
    let (date, occupied) = citas.view().snapshot().occupied.expect("hours shown");
    assert_eq!(date, day(12));
    assert!(occupied.contains(hour(15)));
}

#[then("the occupied hours for July 12 were fetched before and after the update")]
fn the_occupied_hours_were_fetched_twice(world: &WorldFixture) {
    let world = world.world();
    let ctx = world.borrow();
    let lookups = ctx
        .clinic
        .hour_lookups()
        .into_iter()
        .filter(|(date, doctor)| *date == day(12) && *doctor == user_id("d1"))
        .count();
    assert_eq!(lookups, 2);
}

#[then("cita c1 is cancelado")]
fn cita_c1_is_cancelado(world: &WorldFixture) {
    let world = world.world();
    let ctx = world.borrow();
    let cita = ctx.clinic.cita("c1").expect("c1 exists");
    assert_eq!(cita.status(), CitaStatus::Cancelado);
}

#[then("cita c1 is finalizado")]
fn cita_c1_is_finalizado(world: &WorldFixture) {
    let world = world.world();
    let ctx = world.borrow();
    let cita = ctx.clinic.cita("c1").expect("c1 exists");
    assert_eq!(cita.status(), CitaStatus::Finalizado);
}

#[then("the description of c1 reads dolor")]
fn the_description_reads_dolor(world: &WorldFixture) {
    let world = world.world();
    let ctx = world.borrow();
    let detail = ctx.detail.as_ref().expect("detail open");
    let note = detail.view().snapshot().description.expect("reason stored");
    assert_eq!(note.cita.to_string(), "c1");
    assert_eq!(note.description, "dolor");
}

#[then("the detail screen of c1 offers no actions")]
fn the_detail_screen_offers_no_actions(world: &WorldFixture) {
    let world = world.world();
    let ctx = world.borrow();
    let cita = ctx.clinic.cita("c1").expect("c1 exists");
    let detail = ctx.app.cita_detail(cita);
    assert!(detail.view().snapshot().actions.is_empty());
}

#[scenario(
    path = "tests/features/appointment_lifecycle.feature",
    name = "Booking an hour taken since the picker loaded keeps the form open"
)]
fn booking_a_taken_hour_keeps_the_form_open(world: WorldFixture) {
    drop(world);
}

#[scenario(
    path = "tests/features/appointment_lifecycle.feature",
    name = "Booking a free hour closes the form"
)]
fn booking_a_free_hour_closes_the_form(world: WorldFixture) {
    drop(world);
}

#[scenario(
    path = "tests/features/appointment_lifecycle.feature",
    name = "Assistant approval with a reschedule refreshes occupied hours"
)]
fn assistant_approval_with_reschedule(world: WorldFixture) {
    drop(world);
}

#[scenario(
    path = "tests/features/appointment_lifecycle.feature",
    name = "Patient cancels an approved cita giving a reason"
)]
fn patient_cancels_with_reason(world: WorldFixture) {
    drop(world);
}

#[scenario(
    path = "tests/features/appointment_lifecycle.feature",
    name = "A finished cita can no longer be cancelled"
)]
fn finished_cita_cannot_be_cancelled(world: WorldFixture) {
    drop(world);
}
