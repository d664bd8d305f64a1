//! # Command Line
//!
//! clap definitions for the `drivehub` binary and the dispatch from a parsed
//! command to the functions in [`crate::commands`].
//!
//! Output goes to stdout: a short human rendering by default, or the
//! command's DTO as pretty JSON with `--json`.

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;

use crate::commands::booking::BookingReceipt;
use crate::commands::{self, BookingDto, VehicleDto};
use crate::error::ApiError;
use crate::state::ConfigState;
use crate::AppContext;
use drivehub_core::{FuelType, Money, NewVehicle, Transmission, VehicleCategory, VehicleUpdate};

#[derive(Parser, Debug)]
#[command(name = "drivehub")]
#[command(about = "DriveHub car rental storefront")]
pub struct Cli {
    /// Print results as JSON
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and remember the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create a renter account and sign in
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    Whoami,
    /// Browse the catalog
    Cars {
        #[arg(long)]
        search: Option<String>,
        /// Include cars that are not available
        #[arg(long, default_value_t = false)]
        all: bool,
    },
    Car {
        id: String,
    },
    /// Price a rental without booking it
    Quote {
        car_id: String,
        pickup: String,
        #[arg(value_name = "RETURN")]
        return_date: String,
    },
    /// Book a car and pay for it
    Book {
        car_id: String,
        pickup: String,
        #[arg(value_name = "RETURN")]
        return_date: String,
    },
    /// Retry payment for a booking whose payment failed
    Pay {
        booking_id: String,
    },
    /// Your bookings
    Bookings,
    Recommend {
        #[arg(long)]
        last_category: Option<String>,
        #[arg(long)]
        last_car: Option<String>,
        #[arg(long)]
        destination: Option<String>,
        #[arg(long)]
        weather: Option<String>,
    },
    /// Owner panel
    Owner {
        #[command(subcommand)]
        command: OwnerCommand,
    },
    /// Show the effective configuration
    Config,
}

#[derive(Subcommand, Debug)]
pub enum OwnerCommand {
    Dashboard,
    Cars {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, value_enum)]
        sort: Option<SortArg>,
    },
    /// Known feature names for --feature
    Features,
    AddCar(AddCarArgs),
    EditCar(EditCarArgs),
    DeleteCar {
        id: String,
    },
    Bookings {
        #[arg(long)]
        search: Option<String>,
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
    },
    CancelBooking {
        id: String,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SortArg {
    PriceAsc,
    PriceDesc,
    YearAsc,
    YearDesc,
}

impl SortArg {
    fn as_str(&self) -> &'static str {
        match self {
            SortArg::PriceAsc => "price-asc",
            SortArg::PriceDesc => "price-desc",
            SortArg::YearAsc => "year-asc",
            SortArg::YearDesc => "year-desc",
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum StatusArg {
    Pending,
    Confirmed,
    Paid,
    Cancelled,
}

impl StatusArg {
    fn as_str(&self) -> &'static str {
        match self {
            StatusArg::Pending => "pending",
            StatusArg::Confirmed => "confirmed",
            StatusArg::Paid => "paid",
            StatusArg::Cancelled => "cancelled",
        }
    }
}

#[derive(Args, Debug)]
pub struct AddCarArgs {
    #[arg(long)]
    pub brand: String,
    #[arg(long)]
    pub model: String,
    #[arg(long)]
    pub year: i32,
    #[arg(long)]
    pub category: VehicleCategory,
    /// Daily rate, e.g. 89.99
    #[arg(long)]
    pub price: f64,
    #[arg(long)]
    pub seats: u32,
    #[arg(long)]
    pub fuel: FuelType,
    #[arg(long)]
    pub transmission: Transmission,
    #[arg(long)]
    pub location: String,
    #[arg(long)]
    pub description: String,
    #[arg(long)]
    pub image: Option<String>,
    /// Repeat for each feature
    #[arg(long = "feature")]
    pub features: Vec<String>,
}

#[derive(Args, Debug)]
pub struct EditCarArgs {
    pub id: String,
    #[arg(long)]
    pub brand: Option<String>,
    #[arg(long)]
    pub model: Option<String>,
    #[arg(long)]
    pub year: Option<i32>,
    #[arg(long)]
    pub category: Option<VehicleCategory>,
    #[arg(long)]
    pub price: Option<f64>,
    #[arg(long)]
    pub seats: Option<u32>,
    #[arg(long)]
    pub fuel: Option<FuelType>,
    #[arg(long)]
    pub transmission: Option<Transmission>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub image: Option<String>,
    /// Replaces the feature list; repeat for each feature
    #[arg(long = "feature")]
    pub features: Vec<String>,
    #[arg(long)]
    pub available: Option<bool>,
}

fn parse_price(price: f64) -> Result<Money, ApiError> {
    Money::from_wire_amount(price).ok_or_else(|| ApiError::validation("price must be a number"))
}

impl AddCarArgs {
    fn into_new_vehicle(self) -> Result<NewVehicle, ApiError> {
        Ok(NewVehicle {
            brand: self.brand,
            model: self.model,
            year: self.year,
            category: self.category,
            daily_rate: parse_price(self.price)?,
            seating_capacity: self.seats,
            fuel_type: self.fuel,
            transmission: self.transmission,
            location: self.location,
            description: self.description,
            image: self.image,
            features: self.features,
        })
    }
}

impl EditCarArgs {
    fn into_update(self) -> Result<(String, VehicleUpdate), ApiError> {
        let update = VehicleUpdate {
            brand: self.brand,
            model: self.model,
            year: self.year,
            category: self.category,
            daily_rate: self.price.map(parse_price).transpose()?,
            seating_capacity: self.seats,
            fuel_type: self.fuel,
            transmission: self.transmission,
            location: self.location,
            description: self.description,
            image: self.image,
            is_available: self.available,
            features: (!self.features.is_empty()).then_some(self.features),
        };
        Ok((self.id, update))
    }
}

// =============================================================================
// Output
// =============================================================================

fn emit<T: Serialize>(json: bool, value: &T, human: impl FnOnce(&T) -> String) -> Result<(), ApiError> {
    if json {
        let text = serde_json::to_string_pretty(value)
            .map_err(|e| ApiError::internal(format!("Could not render output: {}", e)))?;
        println!("{}", text);
    } else {
        println!("{}", human(value));
    }
    Ok(())
}

fn car_line(config: &ConfigState, car: &VehicleDto) -> String {
    format!(
        "{:<38} {:<12} {:>10}/day  {}{}",
        car.id,
        format!("{} {}", car.category, car.year),
        config.format_currency(car.daily_rate_cents),
        car.display_name(),
        if car.is_available { "" } else { "  (unavailable)" }
    )
}

fn car_table(config: &ConfigState, cars: &[VehicleDto]) -> String {
    if cars.is_empty() {
        return "No cars found".to_string();
    }
    cars.iter()
        .map(|c| car_line(config, c))
        .collect::<Vec<_>>()
        .join("\n")
}

fn receipt_text(config: &ConfigState, r: &BookingReceipt) -> String {
    let mut text = format!(
        "Booking {} confirmed: {} for {} day(s), {} paid (ref {})",
        r.booking.id,
        r.booking.vehicle_name,
        r.days,
        config.format_currency(r.booking.total_price_cents),
        r.payment_reference
    );
    if !r.paid_recorded {
        text.push_str("\nNote: the booking service has not yet recorded the payment");
    }
    text
}

fn booking_table(config: &ConfigState, bookings: &[BookingDto]) -> String {
    if bookings.is_empty() {
        return "No bookings found".to_string();
    }
    bookings
        .iter()
        .map(|b| {
            format!(
                "{:<38} {:<10} {} -> {}  {:>10}  {}",
                b.id,
                b.status,
                b.pickup_date,
                b.return_date,
                config.format_currency(b.total_price_cents),
                b.vehicle_name
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn car_detail(config: &ConfigState, car: &VehicleDto) -> String {
    let mut lines = vec![
        format!("{} ({})", car.display_name(), car.year),
        format!("  id:           {}", car.id),
        format!("  category:     {}", car.category),
        format!("  daily rate:   {}", config.format_currency(car.daily_rate_cents)),
        format!("  seats:        {}", car.seating_capacity),
        format!("  fuel:         {}", car.fuel_type),
        format!("  transmission: {}", car.transmission),
        format!("  location:     {}", car.location),
        format!("  available:    {}", if car.is_available { "yes" } else { "no" }),
    ];
    if !car.features.is_empty() {
        lines.push(format!("  features:     {}", car.features.join(", ")));
    }
    if !car.description.is_empty() {
        lines.push(String::new());
        lines.push(format!("  {}", car.description));
    }
    lines.join("\n")
}

// =============================================================================
// Dispatch
// =============================================================================

/// Runs one parsed command against the application state.
pub async fn dispatch(
    ctx: &mut AppContext,
    json: bool,
    command: Command,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> Result<(), ApiError> {
    let config = ctx.config.clone();

    match command {
        Command::Login { email, password } => {
            let user =
                commands::auth::login(ctx.backend.as_ref(), &mut ctx.session, &email, &password)
                    .await?;
            emit(json, &user, |u| format!("Signed in as {} ({})", u.name, u.role))
        }
        Command::Register {
            name,
            email,
            password,
        } => {
            let user = commands::auth::register(
                ctx.backend.as_ref(),
                &mut ctx.session,
                &name,
                &email,
                &password,
            )
            .await?;
            emit(json, &user, |u| format!("Welcome, {}! You are signed in.", u.name))
        }
        Command::Logout => {
            commands::auth::logout(&mut ctx.session)?;
            emit(json, &serde_json::json!({ "signedIn": false }), |_| {
                "Signed out".to_string()
            })
        }
        Command::Whoami => {
            let user = commands::auth::whoami(&ctx.session);
            emit(json, &user, |u| match u {
                Some(u) => format!("{} <{}> ({})", u.name, u.email, u.role),
                None => "Not signed in".to_string(),
            })
        }
        Command::Cars { search, all } => {
            let cars = commands::catalog::list_cars(&ctx.db, search.as_deref(), all).await?;
            emit(json, &cars, |c| car_table(&config, c))
        }
        Command::Car { id } => {
            let car = commands::catalog::get_car(&ctx.db, &id).await?;
            emit(json, &car, |c| car_detail(&config, c))
        }
        Command::Quote {
            car_id,
            pickup,
            return_date,
        } => {
            let quote = commands::catalog::quote_car(&ctx.db, &car_id, &pickup, &return_date).await?;
            emit(json, &quote, |q| match q.days {
                Some(days) if q.computable => format!(
                    "{} day(s) x {} = {}",
                    days,
                    config.format_currency(q.daily_rate_cents),
                    config.format_currency(q.total_cents)
                ),
                _ => format!(
                    "Total: {} (return date must be after pickup)",
                    config.format_currency(q.total_cents)
                ),
            })
        }
        Command::Book {
            car_id,
            pickup,
            return_date,
        } => {
            let receipt = commands::booking::book(
                &ctx.db,
                &ctx.session,
                ctx.backend.clone(),
                ctx.gateway.clone(),
                &car_id,
                &pickup,
                &return_date,
                today,
            )
            .await?;
            emit(json, &receipt, |r| receipt_text(&config, r))
        }
        Command::Pay { booking_id } => {
            let receipt = commands::booking::pay(
                &ctx.db,
                &ctx.session,
                ctx.backend.clone(),
                ctx.gateway.clone(),
                &booking_id,
            )
            .await?;
            emit(json, &receipt, |r| receipt_text(&config, r))
        }
        Command::Bookings => {
            let bookings =
                commands::booking::my_bookings(&ctx.session, ctx.backend.as_ref()).await?;
            emit(json, &bookings, |b| booking_table(&config, b))
        }
        Command::Recommend {
            last_category,
            last_car,
            destination,
            weather,
        } => {
            let picks = commands::catalog::recommend_cars(
                &ctx.db,
                last_category.as_deref(),
                last_car.as_deref(),
                destination.as_deref(),
                weather.as_deref(),
            )
            .await?;
            emit(json, &picks, |p| {
                if p.is_empty() {
                    return "No cars to recommend".to_string();
                }
                p.iter()
                    .map(|r| format!("{}\n  {}", car_line(&config, &r.vehicle), r.reason))
                    .collect::<Vec<_>>()
                    .join("\n")
            })
        }
        Command::Owner { command } => dispatch_owner(ctx, &config, json, command, now).await,
        Command::Config => {
            let dto = commands::config::show_config(
                &config,
                &ctx.client,
                &ctx.database_path,
                Some(ctx.session.path()),
            );
            emit(json, &dto, |c| {
                format!(
                    "store:    {} ({})\napi:      {}\ntimeout:  {}\npayment:  {}\ndatabase: {}\nsession:  {}",
                    c.store_name,
                    c.currency_code,
                    c.api_base_url,
                    c.request_timeout_secs
                        .map(|s| format!("{}s", s))
                        .unwrap_or_else(|| "none".to_string()),
                    c.payment_mode,
                    c.database_path,
                    c.session_path.as_deref().unwrap_or("-"),
                )
            })
        }
    }
}

async fn dispatch_owner(
    ctx: &mut AppContext,
    config: &ConfigState,
    json: bool,
    command: OwnerCommand,
    now: DateTime<Utc>,
) -> Result<(), ApiError> {
    use chrono::Datelike;

    match command {
        OwnerCommand::Dashboard => {
            let summary = commands::owner::dashboard(&ctx.db, &ctx.session).await?;
            emit(json, &summary, |s| {
                format!(
                    "{} dashboard\n  cars:      {} ({} available)\n  bookings:  {} ({} pending, {} confirmed)\n  revenue:   {}",
                    config.store_name,
                    s.total_cars,
                    s.available_cars,
                    s.total_bookings,
                    s.pending_bookings,
                    s.confirmed_bookings,
                    config.format_money(s.revenue)
                )
            })
        }
        OwnerCommand::Cars {
            search,
            category,
            sort,
        } => {
            let cars = commands::owner::owner_cars(
                &ctx.db,
                &ctx.session,
                search.as_deref(),
                category.as_deref(),
                sort.as_ref().map(SortArg::as_str),
            )
            .await?;
            emit(json, &cars, |c| car_table(config, c))
        }
        OwnerCommand::Features => {
            let features = commands::owner::feature_options();
            emit(json, &features, |f| f.join("\n"))
        }
        OwnerCommand::AddCar(args) => {
            let car = commands::owner::add_car(&ctx.db, &ctx.session, args.into_new_vehicle()?, now)
                .await?;
            emit(json, &car, |c| format!("Listed {} as {}", c.display_name(), c.id))
        }
        OwnerCommand::EditCar(args) => {
            let (id, update) = args.into_update()?;
            let car =
                commands::owner::edit_car(&ctx.db, &ctx.session, &id, update, now.year()).await?;
            emit(json, &car, |c| car_detail(config, c))
        }
        OwnerCommand::DeleteCar { id } => {
            commands::owner::delete_car(&ctx.db, &ctx.session, &id).await?;
            emit(json, &serde_json::json!({ "deleted": id }), |_| {
                format!("Deleted {}", id)
            })
        }
        OwnerCommand::Bookings { search, status } => {
            let bookings = commands::owner::owner_bookings(
                &ctx.db,
                &ctx.session,
                search.as_deref(),
                status.as_ref().map(StatusArg::as_str),
            )
            .await?;
            emit(json, &bookings, |b| booking_table(config, b))
        }
        OwnerCommand::CancelBooking { id } => {
            let booking = commands::owner::cancel_booking(&ctx.db, &ctx.session, &id).await?;
            emit(json, &booking, |b| format!("Booking {} is now {}", b.id, b.status))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_owner_commands() {
        let cli = Cli::parse_from([
            "drivehub", "--json", "owner", "cars", "--category", "suv", "--sort", "price-asc",
        ]);
        assert!(cli.json);
        match cli.command {
            Command::Owner {
                command: OwnerCommand::Cars { category, sort, .. },
            } => {
                assert_eq!(category.as_deref(), Some("suv"));
                assert_eq!(sort.map(|s| s.as_str()), Some("price-asc"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_pay() {
        let cli = Cli::parse_from(["drivehub", "pay", "bk-7"]);
        match cli.command {
            Command::Pay { booking_id } => assert_eq!(booking_id, "bk-7"),
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(Cli::try_parse_from(["drivehub", "pay"]).is_err());
    }

    #[test]
    fn test_add_car_args() {
        let cli = Cli::parse_from([
            "drivehub", "owner", "add-car", "--brand", "Jeep", "--model", "Wrangler", "--year",
            "2021", "--category", "SUV", "--price", "120.5", "--seats", "5", "--fuel", "diesel",
            "--transmission", "manual", "--location", "Denver", "--description", "Trail rated",
            "--feature", "GPS", "--feature", "4WD",
        ]);
        let Command::Owner {
            command: OwnerCommand::AddCar(args),
        } = cli.command
        else {
            panic!("expected add-car");
        };

        let car = args.into_new_vehicle().unwrap();
        assert_eq!(car.category, VehicleCategory::Suv);
        assert_eq!(car.daily_rate, Money::from_cents(12_050));
        assert_eq!(car.features, vec!["GPS".to_string(), "4WD".to_string()]);
    }

    #[test]
    fn test_edit_car_args() {
        let cli = Cli::parse_from(["drivehub", "owner", "edit-car", "car-1", "--available", "false"]);
        let Command::Owner {
            command: OwnerCommand::EditCar(args),
        } = cli.command
        else {
            panic!("expected edit-car");
        };

        let (id, update) = args.into_update().unwrap();
        assert_eq!(id, "car-1");
        assert_eq!(update.is_available, Some(false));
        assert!(update.features.is_none());
    }

    #[test]
    fn test_bad_category_rejected_by_parser() {
        let result = Cli::try_parse_from([
            "drivehub", "owner", "add-car", "--brand", "X", "--model", "Y", "--year", "2021",
            "--category", "spaceship", "--price", "10", "--seats", "2", "--fuel", "petrol",
            "--transmission", "manual", "--location", "Z", "--description", "D",
        ]);
        assert!(result.is_err());
    }
}
