//! # Catalog Seeder
//!
//! Fills an empty database with a demo fleet.
//!
//! ## Usage
//! ```bash
//! # Seed the default dev database
//! cargo run -p drivehub-db --bin seed
//!
//! # Seed a specific file, tagging every car with an owner id
//! cargo run -p drivehub-db --bin seed -- --db ./data/drivehub.db --owner owner-1
//! ```
//!
//! Skips seeding if the catalog already has vehicles.

use chrono::Utc;
use drivehub_core::{FuelType, Money, NewVehicle, Transmission, VehicleCategory};
use drivehub_db::{Database, DbConfig};
use std::env;
use uuid::Uuid;

/// (brand, model, year, category, $/day, seats, fuel, transmission, location)
type FleetEntry = (
    &'static str,
    &'static str,
    i32,
    VehicleCategory,
    i64,
    u32,
    FuelType,
    Transmission,
    &'static str,
);

const FLEET: &[FleetEntry] = &[
    ("BMW", "X5", 2022, VehicleCategory::Suv, 300, 5, FuelType::Diesel, Transmission::Automatic, "New York"),
    ("Toyota", "Corolla", 2021, VehicleCategory::Sedan, 130, 5, FuelType::Petrol, Transmission::Automatic, "Chicago"),
    ("Jeep", "Wrangler", 2023, VehicleCategory::Suv, 200, 4, FuelType::Petrol, Transmission::Manual, "Denver"),
    ("Ford", "Mustang", 2020, VehicleCategory::Convertible, 220, 4, FuelType::Petrol, Transmission::Automatic, "Miami"),
    ("Tesla", "Model 3", 2023, VehicleCategory::Sedan, 180, 5, FuelType::Electric, Transmission::Automatic, "San Francisco"),
    ("Volkswagen", "Golf", 2021, VehicleCategory::Hatchback, 90, 5, FuelType::Petrol, Transmission::Manual, "Boston"),
    ("Toyota", "Prius", 2022, VehicleCategory::Hatchback, 95, 5, FuelType::Hybrid, Transmission::Automatic, "Seattle"),
    ("Audi", "TT", 2019, VehicleCategory::Coupe, 210, 2, FuelType::Petrol, Transmission::SemiAutomatic, "Los Angeles"),
    ("Ford", "F-150", 2022, VehicleCategory::Truck, 170, 5, FuelType::Petrol, Transmission::Automatic, "Dallas"),
    ("Mercedes-Benz", "Sprinter", 2021, VehicleCategory::Van, 240, 12, FuelType::Diesel, Transmission::Automatic, "Atlanta"),
];

const FEATURE_SETS: &[&[&str]] = &[
    &["GPS", "Bluetooth", "Heated Seats"],
    &["Bluetooth", "Backup Camera"],
    &["GPS", "Air Conditioning", "Cruise Control"],
    &["Apple CarPlay", "Android Auto", "Keyless Entry"],
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./drivehub_dev.db");
    let mut owner_id: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--owner" | "-o" => {
                if i + 1 < args.len() {
                    owner_id = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("DriveHub Catalog Seeder");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>     Database file path (default: ./drivehub_dev.db)");
                println!("  -o, --owner <ID>    Owner id to attach to every vehicle");
                println!("  -h, --help          Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🚗 DriveHub Catalog Seeder");
    println!("==========================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.vehicles().count().await?;
    if existing > 0 {
        println!("⚠ Catalog already has {} vehicles", existing);
        println!("  Skipping seed to avoid duplicates.");
        return Ok(());
    }

    let mut inserted = 0;
    for (idx, entry) in FLEET.iter().enumerate() {
        let vehicle = fleet_vehicle(entry, idx).into_vehicle(
            Uuid::new_v4().to_string(),
            owner_id.clone(),
            Utc::now(),
        );

        if let Err(e) = db.vehicles().insert(&vehicle).await {
            eprintln!("Failed to insert {}: {}", vehicle.display_name(), e);
            continue;
        }
        println!("  + {} ({}, {}/day)", vehicle.display_name(), vehicle.category, vehicle.daily_rate);
        inserted += 1;
    }

    println!();
    println!("✓ Inserted {} vehicles", inserted);

    let suvs = db.vehicles().search("suv", true).await?;
    println!("  Search 'suv': {} results", suvs.len());

    println!();
    println!("✓ Seed complete!");
    Ok(())
}

fn fleet_vehicle(entry: &FleetEntry, idx: usize) -> NewVehicle {
    let (brand, model, year, category, rate, seats, fuel, transmission, location) = *entry;
    let features = FEATURE_SETS[idx % FEATURE_SETS.len()]
        .iter()
        .map(|f| f.to_string())
        .collect();

    NewVehicle {
        brand: brand.to_string(),
        model: model.to_string(),
        year,
        category,
        daily_rate: Money::from_major(rate),
        seating_capacity: seats,
        fuel_type: fuel,
        transmission,
        location: location.to_string(),
        description: format!("{year} {brand} {model}, ready for pickup in {location}."),
        image: None,
        features,
    }
}
