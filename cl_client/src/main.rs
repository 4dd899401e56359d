//! Console client for the CareLink hospital network.
//!
//! Signs in against the dispatch backend (or the built-in demo table),
//! walks the email verification gate when required, and opens the
//! role-appropriate dashboard view.

use anyhow::Result;
use carelink::{AuthGateway, AuthState, RouteOutcome, SessionStore, View, routing};
use log::debug;
use pico_args::Arguments;
use std::io::{self, Write};
use std::path::PathBuf;

use cl_client::api_client::{self, ApiClient};
use cl_client::commands::{Command, parse_command};
use cl_client::config::ClientConfig;

const HELP: &str = "\
Connect to a CareLink hospital network

USAGE:
  cl_client [OPTIONS]

OPTIONS:
  --server URL          API base URL  [default: env CARELINK_SERVER or http://localhost:8080/api]
  --email EMAIL         Email for sign-in
  --password PASS       Password for sign-in
  --role ROLE           Role for sign-in (driver, admin, doctor, nurse)
  --session-dir DIR     Session directory  [default: env CARELINK_SESSION_DIR or .carelink_session]
  --mock                Use the built-in demo accounts instead of a server

FLAGS:
  -h, --help            Print help information

ENVIRONMENT:
  CARELINK_SERVER       API base URL
  CARELINK_SESSION_DIR  Session directory
  RUST_LOG              Log filter (e.g. info, carelink=debug)
";

const COMMANDS: &str = "\
Commands:
  verify CODE     submit the emailed verification code
  resend [EMAIL]  request a fresh verification code
  whoami          show the current identity and state
  home            open your role's default view
  goto VIEW       open a view (driver, admin, clinical, landing)
  ambulances      list your hospital's ambulances
  locate LAT LON  report your ambulance's position
  beds            list your hospital's beds
  assign BED \"PATIENT\" CONTACT  assign a patient to a bed
  staff           list your hospital's staff
  hours           show your logged work hours
  stats           show your hospital's stats
  health          probe the backend health endpoint
  logout          sign out
  help            show this list
  quit            exit
";

struct Args {
    server: Option<String>,
    email: Option<String>,
    password: Option<String>,
    role: Option<String>,
    session_dir: Option<PathBuf>,
    use_mock: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists.
    let _ = dotenvy::dotenv();
    env_logger::init();

    let mut pargs = Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        server: pargs.opt_value_from_str("--server")?,
        email: pargs.opt_value_from_str("--email")?,
        password: pargs.opt_value_from_str("--password")?,
        role: pargs.opt_value_from_str("--role")?,
        session_dir: pargs.opt_value_from_str("--session-dir")?,
        use_mock: pargs.contains("--mock"),
    };

    run(args).await
}

async fn run(args: Args) -> Result<()> {
    let config = ClientConfig::from_env(args.server, args.session_dir, args.use_mock);
    debug!("using server {}", config.server_url);

    let store = SessionStore::on_disk(&config.session_dir);
    let mut gateway = if config.use_mock {
        AuthGateway::mock(store)
    } else {
        AuthGateway::remote(config.server_url.clone(), store)
    };

    let mut api = ApiClient::new(config.server_url.clone());
    api.set_token(gateway.store().token().map(str::to_string));

    let mut prefill = (args.email, args.password, args.role);

    loop {
        match gateway.state() {
            AuthState::Anonymous => {
                if !sign_in(&mut gateway, &mut prefill).await? {
                    return Ok(());
                }
            }
            AuthState::PendingVerification => {
                println!("\nA 6-digit verification code was sent to your email.");
                println!("Enter 'verify CODE', 'resend', or 'quit'.");
                if !verification_loop(&mut gateway).await? {
                    return Ok(());
                }
            }
            AuthState::Authenticated => {
                api.set_token(gateway.store().token().map(str::to_string));
                let done = session_loop(&mut gateway, &api).await?;
                api.set_token(None);
                if done {
                    return Ok(());
                }
            }
        }
    }
}

/// Prompt for credentials and attempt a sign-in. Returns `false` when the
/// user asks to quit.
async fn sign_in(
    gateway: &mut AuthGateway,
    prefill: &mut (Option<String>, Option<String>, Option<String>),
) -> Result<bool> {
    let email = match prefill.0.take() {
        Some(email) => email,
        None => prompt("Email: ")?,
    };
    if email == "quit" || email == "exit" {
        return Ok(false);
    }
    let password = match prefill.1.take() {
        Some(password) => password,
        None => prompt("Password: ")?,
    };
    let role = match prefill.2.take() {
        Some(role) => role,
        None => prompt("Role (driver/admin/doctor/nurse): ")?,
    };

    println!("Signing in as {email}...");
    if gateway.sign_in(&email, &password, &role).await {
        println!("Signed in.");
    } else if gateway.state() == AuthState::PendingVerification {
        println!("Sign-in accepted; email verification required.");
    } else {
        println!("{}.", gateway.last_error().unwrap_or("Sign-in failed"));
    }
    Ok(true)
}

/// Handle input while a verification is pending. Returns `false` when the
/// user asks to quit.
async fn verification_loop(gateway: &mut AuthGateway) -> Result<bool> {
    while gateway.state() == AuthState::PendingVerification {
        let line = prompt("verify> ")?;
        if line.is_empty() {
            continue;
        }
        match parse_command(&line) {
            Ok(Command::Verify(code)) => {
                if gateway.verify_email(&code).await {
                    if gateway.state() == AuthState::Authenticated {
                        println!("Email verified.");
                    } else {
                        println!("Email verified; sign in again to continue.");
                    }
                } else {
                    println!(
                        "{}.",
                        gateway.last_error().unwrap_or("Invalid verification code")
                    );
                }
            }
            Ok(Command::Resend(email)) => {
                if gateway.resend_verification(email.as_deref().unwrap_or("")).await {
                    println!("Verification code resent.");
                } else {
                    println!(
                        "{}.",
                        gateway
                            .last_error()
                            .unwrap_or("Could not resend the verification code")
                    );
                }
            }
            Ok(Command::Logout) => gateway.logout(),
            Ok(Command::Quit) => return Ok(false),
            Ok(_) => println!("Finish verification first ('verify CODE')."),
            Err(e) => println!("{e}"),
        }
    }
    Ok(true)
}

/// The authenticated command loop. Returns `true` when the user asks to
/// quit, `false` after a logout (back to the sign-in prompt).
async fn session_loop(gateway: &mut AuthGateway, api: &ApiClient) -> Result<bool> {
    let view = routing::default_view(gateway.store());
    println!();
    render_view(gateway, api, view).await;
    println!("\nType 'help' for commands.");

    while gateway.state() == AuthState::Authenticated {
        let line = prompt("carelink> ")?;
        if line.is_empty() {
            continue;
        }
        match parse_command(&line) {
            Ok(Command::Quit) => return Ok(true),
            Ok(Command::Logout) => {
                gateway.logout();
                println!("Signed out.");
                return Ok(false);
            }
            Ok(Command::Help) => print!("{COMMANDS}"),
            Ok(Command::WhoAmI) => {
                if let Some(identity) = gateway.store().identity() {
                    let affiliation = identity
                        .hospital_name
                        .as_deref()
                        .map(|name| format!(" at {name}"))
                        .unwrap_or_default();
                    println!(
                        "{} <{}>, {}{}",
                        identity.name, identity.email, identity.role, affiliation
                    );
                }
            }
            Ok(Command::Home) => {
                let view = routing::default_view(gateway.store());
                render_view(gateway, api, view).await;
            }
            Ok(Command::Goto(requested)) => match routing::authorize(gateway.store(), requested) {
                RouteOutcome::Granted(view) => render_view(gateway, api, view).await,
                RouteOutcome::RedirectToLanding => {
                    println!("Your role cannot open the {requested}; showing the landing view.");
                    render_view(gateway, api, View::Landing).await;
                }
                RouteOutcome::RedirectToSignIn => {
                    // Unreachable while authenticated; loop back to sign-in.
                    return Ok(false);
                }
            },
            Ok(Command::Ambulances) => show_ambulances(gateway, api).await,
            Ok(Command::Locate {
                latitude,
                longitude,
            }) => {
                let update = api_client::LocationUpdate {
                    latitude,
                    longitude,
                    status: None,
                    pickup_address: None,
                    patient_name: None,
                    emergency_level: None,
                };
                match api.update_ambulance_location(&update).await {
                    Ok(ambulance) => println!(
                        "Position reported for vehicle {}.",
                        ambulance.vehicle_number
                    ),
                    Err(e) => println!("Could not report position: {e}"),
                }
            }
            Ok(Command::Beds) => show_beds(gateway, api).await,
            Ok(Command::Assign {
                bed_id,
                patient_name,
                patient_contact,
            }) => match api.assign_bed(&bed_id, &patient_name, &patient_contact).await {
                Ok(bed) => println!("Bed {} assigned to {patient_name}.", bed.bed_number),
                Err(e) => println!("Could not assign bed: {e}"),
            },
            Ok(Command::Staff) => show_staff(gateway, api).await,
            Ok(Command::Hours) => show_work_hours(gateway, api).await,
            Ok(Command::Stats) => show_stats(gateway, api).await,
            Ok(Command::Health) => match api.check_health().await {
                Ok(message) => println!("Backend: {message}"),
                Err(e) => println!("Backend unreachable: {e}"),
            },
            Ok(Command::Verify(_)) | Ok(Command::Resend(_)) => {
                println!("No verification is pending.");
            }
            Err(e) => println!("{e}"),
        }
    }
    Ok(false)
}

async fn render_view(gateway: &AuthGateway, api: &ApiClient, view: View) {
    match view {
        View::Landing => {
            println!("CareLink - ambulance dispatch, beds, and staffing in one place.");
            match api.hospitals().await {
                Ok(hospitals) => {
                    for hospital in hospitals {
                        let beds = match (hospital.available_beds, hospital.total_beds) {
                            (Some(available), Some(total)) => {
                                format!(" ({available}/{total} beds free)")
                            }
                            _ => String::new(),
                        };
                        println!("  {}{}", hospital.name, beds);
                    }
                }
                Err(e) => debug!("could not load the hospital list: {e}"),
            }
        }
        View::SignIn => println!("Use 'logout' and sign back in to switch accounts."),
        View::DriverDashboard => {
            println!("== Driver dashboard ==");
            match api.my_ambulance().await {
                Ok(ambulance) => {
                    println!("Vehicle {} - {}", ambulance.vehicle_number, ambulance.status);
                    if let (Some(lat), Some(lon)) =
                        (ambulance.current_latitude, ambulance.current_longitude)
                    {
                        println!("Last reported position: {lat:.5}, {lon:.5}");
                    }
                    if let Some(patient) = &ambulance.patient_name {
                        println!("En route for: {patient}");
                    }
                }
                Err(e) => println!("No ambulance data: {e}"),
            }
        }
        View::AdminDashboard => {
            println!("== Admin dashboard ==");
            show_stats(gateway, api).await;
            show_ambulances(gateway, api).await;
        }
        View::ClinicalDashboard => {
            println!("== Clinical dashboard ==");
            show_beds(gateway, api).await;
        }
    }
}

fn hospital_id(gateway: &AuthGateway) -> Option<String> {
    gateway
        .store()
        .identity()
        .and_then(|identity| identity.hospital_id.clone())
}

async fn show_ambulances(gateway: &AuthGateway, api: &ApiClient) {
    let Some(hospital_id) = hospital_id(gateway) else {
        println!("No hospital affiliation on this account.");
        return;
    };
    match api.hospital_ambulances(&hospital_id).await {
        Ok(ambulances) if ambulances.is_empty() => println!("No ambulances registered."),
        Ok(ambulances) => {
            for a in ambulances {
                println!("  {} - {}", a.vehicle_number, a.status);
            }
        }
        Err(e) => println!("Could not load ambulances: {e}"),
    }
}

async fn show_beds(gateway: &AuthGateway, api: &ApiClient) {
    let Some(hospital_id) = hospital_id(gateway) else {
        println!("No hospital affiliation on this account.");
        return;
    };
    match api.hospital_beds(&hospital_id).await {
        Ok(beds) if beds.is_empty() => println!("No beds registered."),
        Ok(beds) => {
            for bed in beds {
                let patient = bed
                    .patient_name
                    .as_deref()
                    .map(|name| format!(" ({name})"))
                    .unwrap_or_default();
                println!("  Bed {} - {}{}", bed.bed_number, bed.status, patient);
            }
        }
        Err(e) => println!("Could not load beds: {e}"),
    }
}

async fn show_staff(gateway: &AuthGateway, api: &ApiClient) {
    let Some(hospital_id) = hospital_id(gateway) else {
        println!("No hospital affiliation on this account.");
        return;
    };
    match api.hospital_staff(&hospital_id).await {
        Ok(staff) if staff.is_empty() => println!("No staff registered."),
        Ok(staff) => {
            for member in staff {
                println!("  {} <{}> - {}", member.name, member.email, member.role);
            }
        }
        Err(e) => println!("Could not load staff: {e}"),
    }
}

async fn show_work_hours(gateway: &AuthGateway, api: &ApiClient) {
    let Some(user_id) = gateway
        .store()
        .identity()
        .map(|identity| identity.id.clone())
    else {
        return;
    };
    match api.work_hours(&user_id).await {
        Ok(hours) if hours.is_empty() => println!("No work hours logged."),
        Ok(hours) => {
            for entry in hours {
                println!(
                    "  {} - {:.1}h scheduled, {:.1}h worked, {:.1}h overtime{}",
                    entry.work_date,
                    entry.scheduled_hours.unwrap_or(0.0),
                    entry.actual_hours.unwrap_or(0.0),
                    entry.overtime_hours.unwrap_or(0.0),
                    entry
                        .department
                        .as_deref()
                        .map(|d| format!(" ({d})"))
                        .unwrap_or_default()
                );
            }
        }
        Err(e) => println!("Could not load work hours: {e}"),
    }
}

async fn show_stats(gateway: &AuthGateway, api: &ApiClient) {
    let Some(hospital_id) = hospital_id(gateway) else {
        println!("No hospital affiliation on this account.");
        return;
    };
    match api.hospital_stats(&hospital_id).await {
        Ok(stats) => {
            println!(
                "Beds: {}/{} available ({} occupied)",
                stats.available_beds, stats.total_beds, stats.occupied_beds
            );
            println!(
                "Staff: {} doctors, {} nurses, {} drivers; {} ambulances",
                stats.doctors, stats.nurses, stats.drivers, stats.ambulances
            );
        }
        Err(e) => println!("Could not load stats: {e}"),
    }
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}
