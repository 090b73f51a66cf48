//! Environmental impact derived linearly from donated food mass.

use serde::Serialize;

/// kg CO₂-equivalent avoided per kg of food redistributed.
pub const CO2_FACTOR: f64 = 2.5;

/// Methane coefficient used by every dashboard and impact report.
pub const REPORT_METHANE_FACTOR: f64 = 0.5;

/// Methane coefficient used by the single-donation preview shown while a donor
/// fills in the donation form.
pub const PREVIEW_METHANE_FACTOR: f64 = 0.25;

pub const MEALS_PER_KG: f64 = 3.0;

/// kg CO₂ a tree absorbs, for the "equivalent trees" figure.
pub const CO2_PER_TREE_KG: f64 = 20.0;

pub const MEALS_PER_PERSON: i64 = 3;

/// Impact figures for a quantity of food.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Default)]
pub struct Impact {
    pub co2_reduced_kg: f64,
    pub methane_reduced_kg: f64,
    pub estimated_meals: i64,
}

/// Rounded single-donation figures.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct ImpactPreview {
    pub quantity_kg: f64,
    pub co2_reduced_kg: f64,
    pub methane_reduced_kg: f64,
    pub estimated_meals: i64,
}

/// Negative or non-finite quantities count as zero.
fn sanitize(quantity_kg: f64) -> f64 {
    if quantity_kg.is_finite() && quantity_kg >= 0.0 {
        quantity_kg
    } else {
        tracing::warn!(quantity_kg, "Invalid quantity for impact calculation, using zero");
        0.0
    }
}

/// Apply the impact factors with an explicit methane coefficient.
pub fn calculate(quantity_kg: f64, methane_factor: f64) -> Impact {
    let quantity_kg = sanitize(quantity_kg);
    Impact {
        co2_reduced_kg: quantity_kg * CO2_FACTOR,
        methane_reduced_kg: quantity_kg * methane_factor,
        estimated_meals: (quantity_kg * MEALS_PER_KG).floor() as i64,
    }
}

/// Unrounded impact for aggregate reports.
pub fn report(quantity_kg: f64) -> Impact {
    calculate(quantity_kg, REPORT_METHANE_FACTOR)
}

/// Single-donation preview rounded to one decimal place.
pub fn preview(quantity_kg: f64) -> ImpactPreview {
    let impact = calculate(quantity_kg, PREVIEW_METHANE_FACTOR);
    ImpactPreview {
        quantity_kg: sanitize(quantity_kg),
        co2_reduced_kg: round_tenth(impact.co2_reduced_kg),
        methane_reduced_kg: round_tenth(impact.methane_reduced_kg),
        estimated_meals: impact.estimated_meals,
    }
}

/// Round to the nearest 0.1.
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn trees_equivalent(co2_reduced_kg: f64) -> i64 {
    (co2_reduced_kg / CO2_PER_TREE_KG).floor() as i64
}

pub fn people_served(estimated_meals: i64) -> i64 {
    estimated_meals / MEALS_PER_PERSON
}

/// en-US display formatting: thousands separators, at most three fraction digits.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let rounded = (value * 1000.0).round() / 1000.0;
    let formatted = format!("{:.3}", rounded.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded < 0.0 { "-" } else { "" };
    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac_part}")
    }
}
