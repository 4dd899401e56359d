//! Console command parsing.

use carelink::View;
use std::fmt;

/// A parsed console command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Submit an email verification code.
    Verify(String),
    /// Ask for a fresh verification code, optionally for an explicit email.
    Resend(Option<String>),
    /// Terminate the session.
    Logout,
    /// Print the current identity and session state.
    WhoAmI,
    /// Navigate to a named view.
    Goto(View),
    /// Navigate to the role's default view.
    Home,
    /// List the hospital's ambulances.
    Ambulances,
    /// Report the driver's current position.
    Locate { latitude: f64, longitude: f64 },
    /// List the hospital's beds.
    Beds,
    /// Assign a patient to a bed.
    Assign {
        bed_id: String,
        patient_name: String,
        patient_contact: String,
    },
    /// Show the caller's logged work hours.
    Hours,
    /// List the hospital's staff.
    Staff,
    /// Show the hospital's stats.
    Stats,
    /// Probe the backend health endpoint.
    Health,
    /// Show the command reference.
    Help,
    /// Exit the console.
    Quit,
}

/// Errors that can occur during command parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Verify command missing its code.
    MissingVerificationCode,
    /// Goto command naming an unknown view.
    UnknownView(String),
    /// Goto command missing its view name.
    MissingView,
    /// Locate command with missing or non-numeric coordinates.
    InvalidCoordinates,
    /// Assign command missing one of its arguments.
    InvalidAssignment,
    /// Unrecognized command.
    UnrecognizedCommand(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingVerificationCode => {
                write!(f, "Verify requires a code (e.g., 'verify 123456')")
            }
            Self::UnknownView(name) => write!(
                f,
                "Unknown view '{}'. Use 'driver', 'admin', 'clinical', or 'landing'",
                name
            ),
            Self::MissingView => {
                write!(f, "Goto requires a view (e.g., 'goto admin')")
            }
            Self::InvalidCoordinates => write!(
                f,
                "Locate requires two coordinates (e.g., 'locate 51.5072 -0.1276')"
            ),
            Self::InvalidAssignment => write!(
                f,
                "Assign requires a bed, patient, and contact (e.g., 'assign 12 \"Jo Park\" 555-0162')"
            ),
            Self::UnrecognizedCommand(cmd) => write!(
                f,
                "Unrecognized command '{}'. Type 'help' to see available commands",
                cmd
            ),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse a console input line into a [`Command`].
pub fn parse_command(input: &str) -> Result<Command, ParseError> {
    let trimmed = input.trim();

    // Single-word commands first.
    match trimmed {
        "logout" => return Ok(Command::Logout),
        "whoami" => return Ok(Command::WhoAmI),
        "home" => return Ok(Command::Home),
        "ambulances" => return Ok(Command::Ambulances),
        "beds" => return Ok(Command::Beds),
        "hours" => return Ok(Command::Hours),
        "staff" => return Ok(Command::Staff),
        "stats" => return Ok(Command::Stats),
        "health" => return Ok(Command::Health),
        "help" => return Ok(Command::Help),
        "quit" | "exit" => return Ok(Command::Quit),
        "resend" => return Ok(Command::Resend(None)),
        _ => {}
    }

    let parts: Vec<&str> = trimmed.split_ascii_whitespace().collect();
    match parts.first() {
        Some(&"verify") => match parts.get(1) {
            Some(code) => Ok(Command::Verify((*code).to_string())),
            None => Err(ParseError::MissingVerificationCode),
        },
        Some(&"resend") => Ok(Command::Resend(parts.get(1).map(|s| (*s).to_string()))),
        Some(&"goto") => parse_goto(&parts),
        Some(&"locate") => parse_locate(&parts),
        Some(&"assign") => parse_assign(trimmed),
        _ => Err(ParseError::UnrecognizedCommand(trimmed.to_string())),
    }
}

fn parse_locate(parts: &[&str]) -> Result<Command, ParseError> {
    match (parts.get(1), parts.get(2)) {
        (Some(lat), Some(lon)) => {
            let latitude = lat.parse().map_err(|_| ParseError::InvalidCoordinates)?;
            let longitude = lon.parse().map_err(|_| ParseError::InvalidCoordinates)?;
            Ok(Command::Locate {
                latitude,
                longitude,
            })
        }
        _ => Err(ParseError::InvalidCoordinates),
    }
}

/// Parse `assign BED "PATIENT NAME" CONTACT`; the patient name may be
/// quoted to allow spaces.
fn parse_assign(input: &str) -> Result<Command, ParseError> {
    let rest = input.trim_start_matches("assign").trim();
    let (bed_id, rest) = rest.split_once(' ').ok_or(ParseError::InvalidAssignment)?;
    let rest = rest.trim();

    let (patient_name, contact) = if let Some(quoted) = rest.strip_prefix('"') {
        let (name, tail) = quoted.split_once('"').ok_or(ParseError::InvalidAssignment)?;
        (name.to_string(), tail.trim())
    } else {
        let (name, tail) = rest.split_once(' ').ok_or(ParseError::InvalidAssignment)?;
        (name.to_string(), tail.trim())
    };

    if bed_id.is_empty() || patient_name.is_empty() || contact.is_empty() {
        return Err(ParseError::InvalidAssignment);
    }
    Ok(Command::Assign {
        bed_id: bed_id.to_string(),
        patient_name,
        patient_contact: contact.to_string(),
    })
}

fn parse_goto(parts: &[&str]) -> Result<Command, ParseError> {
    let name = parts.get(1).ok_or(ParseError::MissingView)?;
    let view = match name.to_ascii_lowercase().as_str() {
        "driver" => View::DriverDashboard,
        "admin" => View::AdminDashboard,
        "clinical" | "doctor" | "nurse" => View::ClinicalDashboard,
        "landing" | "root" => View::Landing,
        "signin" | "login" => View::SignIn,
        _ => return Err(ParseError::UnknownView((*name).to_string())),
    };
    Ok(Command::Goto(view))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_word_commands() {
        assert_eq!(parse_command("logout"), Ok(Command::Logout));
        assert_eq!(parse_command(" whoami "), Ok(Command::WhoAmI));
        assert_eq!(parse_command("quit"), Ok(Command::Quit));
        assert_eq!(parse_command("exit"), Ok(Command::Quit));
        assert_eq!(parse_command("resend"), Ok(Command::Resend(None)));
    }

    #[test]
    fn parses_verify_with_code() {
        assert_eq!(
            parse_command("verify 123456"),
            Ok(Command::Verify("123456".to_string()))
        );
        assert_eq!(
            parse_command("verify"),
            Err(ParseError::MissingVerificationCode)
        );
    }

    #[test]
    fn parses_goto_views() {
        assert_eq!(
            parse_command("goto admin"),
            Ok(Command::Goto(View::AdminDashboard))
        );
        assert_eq!(
            parse_command("goto DRIVER"),
            Ok(Command::Goto(View::DriverDashboard))
        );
        assert_eq!(
            parse_command("goto nurse"),
            Ok(Command::Goto(View::ClinicalDashboard))
        );
        assert_eq!(
            parse_command("goto moon"),
            Err(ParseError::UnknownView("moon".to_string()))
        );
        assert_eq!(parse_command("goto"), Err(ParseError::MissingView));
    }

    #[test]
    fn parses_locate_with_signed_coordinates() {
        assert_eq!(
            parse_command("locate 51.5072 -0.1276"),
            Ok(Command::Locate {
                latitude: 51.5072,
                longitude: -0.1276
            })
        );
        assert_eq!(
            parse_command("locate north west"),
            Err(ParseError::InvalidCoordinates)
        );
        assert_eq!(parse_command("locate 51.5"), Err(ParseError::InvalidCoordinates));
    }

    #[test]
    fn parses_assign_with_quoted_patient_name() {
        assert_eq!(
            parse_command("assign 12 \"Jo Park\" 555-0162"),
            Ok(Command::Assign {
                bed_id: "12".to_string(),
                patient_name: "Jo Park".to_string(),
                patient_contact: "555-0162".to_string(),
            })
        );
        assert_eq!(
            parse_command("assign 12 Jo 555-0162"),
            Ok(Command::Assign {
                bed_id: "12".to_string(),
                patient_name: "Jo".to_string(),
                patient_contact: "555-0162".to_string(),
            })
        );
        assert_eq!(parse_command("assign 12"), Err(ParseError::InvalidAssignment));
    }

    #[test]
    fn rejects_unknown_commands() {
        assert!(matches!(
            parse_command("launch"),
            Err(ParseError::UnrecognizedCommand(_))
        ));
    }
}
