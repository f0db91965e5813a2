//! Demo catalog seeding.
//!
//! Replaces the listing table with the agency's eight sample properties.
//! Used by `inmobot seed` and by tests that need a populated catalog.

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::SqlitePool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::models::{Listing, ListingCategory, OperationKind};

/// Row counts after seeding.
#[derive(Debug, Clone, Copy)]
pub struct SeedSummary {
    pub total: i64,
    pub for_sale: i64,
    pub for_rent: i64,
}

/// Wipe the listing table and insert the demo catalog. Safe to re-run.
pub async fn seed_listings(pool: &SqlitePool) -> Result<SeedSummary> {
    sqlx::query("DELETE FROM listings")
        .execute(pool)
        .await
        .context("Failed to clear listings")?;

    for listing in demo_listings() {
        insert_listing(pool, &listing)
            .await
            .with_context(|| format!("Failed to insert listing '{}'", listing.title))?;
    }

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM listings")
        .fetch_one(pool)
        .await?;
    let for_sale: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM listings WHERE operation = ?")
        .bind(OperationKind::Sale)
        .fetch_one(pool)
        .await?;
    let for_rent: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM listings WHERE operation = ?")
        .bind(OperationKind::Rental)
        .fetch_one(pool)
        .await?;

    tracing::info!("Seeded {} listings ({} sale, {} rental)", total, for_sale, for_rent);
    Ok(SeedSummary {
        total,
        for_sale,
        for_rent,
    })
}

pub(crate) async fn insert_listing(pool: &SqlitePool, listing: &Listing) -> sqlx::Result<()> {
    sqlx::query(
        "INSERT INTO listings (id, title, category, operation, price, currency, location, \
         address, rooms, bathrooms, total_surface, covered_surface, description, features, \
         status, published_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(listing.id)
    .bind(&listing.title)
    .bind(listing.category)
    .bind(listing.operation)
    .bind(listing.price)
    .bind(&listing.currency)
    .bind(&listing.location)
    .bind(&listing.address)
    .bind(listing.rooms)
    .bind(listing.bathrooms)
    .bind(listing.total_surface)
    .bind(listing.covered_surface)
    .bind(&listing.description)
    .bind(&listing.features)
    .bind(&listing.status)
    .bind(listing.published_at)
    .execute(pool)
    .await?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn listing(
    title: &str,
    category: ListingCategory,
    operation: OperationKind,
    price: f64,
    location: &str,
    address: &str,
    rooms: i64,
    bathrooms: i64,
    total_surface: f64,
    covered_surface: f64,
    description: &str,
    features: &[&str],
) -> Listing {
    Listing {
        id: Uuid::new_v4(),
        title: title.into(),
        category,
        operation,
        price,
        currency: "USD".into(),
        location: location.into(),
        address: address.into(),
        rooms,
        bathrooms,
        total_surface,
        covered_surface,
        description: description.into(),
        features: Json(features.iter().map(|f| f.to_string()).collect()),
        status: "available".into(),
        published_at: Utc::now(),
    }
}

pub(crate) fn demo_listings() -> Vec<Listing> {
    use ListingCategory::*;
    use OperationKind::*;

    vec![
        listing(
            "Departamento moderno en el centro",
            Apartment,
            Rental,
            750.0,
            "Centro, Rosario",
            "San Martín 1234",
            2,
            1,
            65.0,
            65.0,
            "Excelente departamento de 2 dormitorios en pleno centro. Totalmente amoblado, \
             con cocina equipada y seguridad 24hs.",
            &["amoblado", "seguridad", "cocina equipada", "luminoso"],
        ),
        listing(
            "Casa familiar con jardín",
            House,
            Sale,
            180_000.0,
            "Fisherton, Rosario",
            "Mendoza 5678",
            3,
            2,
            280.0,
            180.0,
            "Hermosa casa familiar con amplio jardín. 3 dormitorios, 2 baños, living-comedor, \
             cocina integrada, quincho y pileta.",
            &["jardín", "pileta", "quincho", "cochera", "parrilla"],
        ),
        listing(
            "Monoambiente para estudiantes",
            Apartment,
            Rental,
            450.0,
            "Pichincha, Rosario",
            "Riobamba 890",
            1,
            1,
            35.0,
            35.0,
            "Monoambiente ideal para estudiantes o jóvenes profesionales. Zona segura con \
             todos los servicios.",
            &["luminoso", "balcón", "calefacción"],
        ),
        listing(
            "Departamento con vista al río",
            Apartment,
            Sale,
            120_000.0,
            "Parque España, Rosario",
            "Av. Belgrano 3456",
            2,
            2,
            85.0,
            85.0,
            "Espectacular departamento con vista panorámica al río Paraná. 2 dormitorios con \
             placard, 2 baños completos, balcón corrido.",
            &["vista al río", "balcón", "cochera", "baulera", "sum"],
        ),
        listing(
            "Local comercial céntrico",
            CommercialUnit,
            Rental,
            1_200.0,
            "Córdoba y Santa Fe, Rosario",
            "Córdoba 2345",
            0,
            1,
            90.0,
            90.0,
            "Excelente local comercial en esquina de alta circulación peatonal. Ideal para \
             cualquier rubro.",
            &["esquina", "vidriera", "baño", "depósito"],
        ),
        listing(
            "Casa quinta con parque",
            House,
            Sale,
            250_000.0,
            "Funes, Santa Fe",
            "Los Alamos 123",
            4,
            3,
            1_200.0,
            300.0,
            "Hermosa quinta con amplio parque arbolado. Casa de 4 dormitorios, quincho, \
             pileta y cancha de paddle.",
            &["parque", "pileta", "quincho", "paddle", "seguridad"],
        ),
        listing(
            "Oficina en edificio corporativo",
            Office,
            Rental,
            900.0,
            "Microcentro, Rosario",
            "Corrientes 1567 - Piso 8",
            0,
            1,
            70.0,
            70.0,
            "Oficina en edificio de primer nivel con recepción y seguridad. Planta libre, \
             baño privado, vista panorámica.",
            &["recepción", "seguridad", "aire acondicionado", "internet"],
        ),
        listing(
            "Terreno para desarrollo",
            Land,
            Sale,
            95_000.0,
            "Zona Oeste, Rosario",
            "Av. Circunvalación km 8",
            0,
            0,
            800.0,
            0.0,
            "Terreno de 800m² en zona de desarrollo. Todos los servicios. Ideal para \
             proyecto inmobiliario o comercial.",
            &["esquina", "servicios", "zonificación comercial"],
        ),
    ]
}
