//! Market simulation
//!
//! Enumerates a fixed Cartesian grid of plausible listing configurations
//! around one request, holding city, area and parking constant, and runs
//! the whole grid through the model as a single batch. The batched call is
//! the dominant cost of a judgment request.

use std::time::Instant;

use ndarray::{Array1, Array2};
use rayon::prelude::*;
use tracing::debug;

use crate::encoding::{FeatureEncoder, ListingAttributes};
use crate::error::{AqariyError, Result};
use crate::model::PriceModel;

// The enumeration ranges the original market scan was tuned with. Kept
// verbatim for behavioral compatibility.
pub const GRID_ROOMS: [u32; 4] = [1, 2, 3, 4];
pub const GRID_BATHROOMS: [u32; 3] = [1, 2, 3];
pub const GRID_AGES: [u32; 5] = [0, 5, 9, 19, 20];
pub const GRID_FLOORS: [i32; 6] = [0, 1, 2, 3, 4, 11];
pub const GRID_FURNISHED: [bool; 2] = [false, true];
pub const GRID_PAYMENT: [i32; 3] = [0, 1, 2];
pub const GRID_MORTGAGED: [bool; 2] = [false, true];

/// Number of synthetic listings per simulation: 4*3*5*6*2*3*2
pub const GRID_SIZE: usize = GRID_ROOMS.len()
    * GRID_BATHROOMS.len()
    * GRID_AGES.len()
    * GRID_FLOORS.len()
    * GRID_FURNISHED.len()
    * GRID_PAYMENT.len()
    * GRID_MORTGAGED.len();

/// One grid coordinate: the attributes that vary between market samples.
#[derive(Debug, Clone, Copy)]
struct GridPoint {
    rooms: u32,
    bathrooms: u32,
    building_age: u32,
    floor: i32,
    furnished: bool,
    payment_method: i32,
    mortgaged: bool,
}

fn enumerate_grid() -> Vec<GridPoint> {
    let mut points = Vec::with_capacity(GRID_SIZE);
    for rooms in GRID_ROOMS {
        for bathrooms in GRID_BATHROOMS {
            for building_age in GRID_AGES {
                for floor in GRID_FLOORS {
                    for furnished in GRID_FURNISHED {
                        for payment_method in GRID_PAYMENT {
                            for mortgaged in GRID_MORTGAGED {
                                points.push(GridPoint {
                                    rooms,
                                    bathrooms,
                                    building_age,
                                    floor,
                                    furnished,
                                    payment_method,
                                    mortgaged,
                                });
                            }
                        }
                    }
                }
            }
        }
    }
    points
}

/// Simulates the local market for one listing.
#[derive(Debug, Clone)]
pub struct MarketSimulator {
    encoder: FeatureEncoder,
}

impl MarketSimulator {
    pub fn new(encoder: FeatureEncoder) -> Self {
        Self { encoder }
    }

    /// Encode the full grid for `attrs` into one batch, schema-aligned.
    ///
    /// City, area and parking stay fixed at the request's values; the seven
    /// grid dimensions sweep their enumerations. Deterministic: row order
    /// follows the nested enumeration order.
    pub fn encode_grid(&self, attrs: &ListingAttributes) -> Result<Array2<f64>> {
        let width = self.encoder.schema().len();
        let points = enumerate_grid();

        let rows: Vec<Array1<f64>> = points
            .par_iter()
            .map(|p| {
                self.encoder.encode_parts(
                    p.rooms,
                    p.bathrooms,
                    p.furnished,
                    attrs.area,
                    p.floor,
                    p.building_age,
                    p.mortgaged,
                    p.payment_method,
                    &attrs.city,
                )
            })
            .collect();

        let mut flat = Vec::with_capacity(GRID_SIZE * width);
        for row in &rows {
            flat.extend(row.iter().copied());
        }
        Array2::from_shape_vec((GRID_SIZE, width), flat)
            .map_err(|e| AqariyError::ShapeError(e.to_string()))
    }

    /// Run the grid through the model in one batched call and return the
    /// 4320 simulated prices.
    pub fn simulate(
        &self,
        attrs: &ListingAttributes,
        model: &dyn PriceModel,
    ) -> Result<Array1<f64>> {
        let started = Instant::now();
        let batch = self.encode_grid(attrs)?;
        let prices = model.predict(&batch)?;

        if prices.len() != GRID_SIZE {
            return Err(AqariyError::ModelError(format!(
                "model returned {} prices for a {} row batch",
                prices.len(),
                GRID_SIZE
            )));
        }

        debug!(
            samples = GRID_SIZE,
            elapsed_ms = started.elapsed().as_millis() as u64,
            city = %attrs.city,
            "Simulated market distribution"
        );
        Ok(prices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{FeatureSchema, COL_AREA, COL_ROOMS};
    use std::sync::Arc;

    struct RoomsModel;

    impl PriceModel for RoomsModel {
        fn predict(&self, features: &Array2<f64>) -> Result<Array1<f64>> {
            Ok(features.column(0).mapv(|r| r * 1000.0))
        }

        fn explain(&self, features: &Array2<f64>) -> Result<Array2<f64>> {
            Ok(features.clone())
        }
    }

    fn simulator() -> MarketSimulator {
        let schema = Arc::new(FeatureSchema::new(vec![
            COL_ROOMS.to_string(),
            COL_AREA.to_string(),
            "city_Amman".to_string(),
        ]));
        let cities = Arc::new(vec!["Amman".to_string()]);
        MarketSimulator::new(FeatureEncoder::new(schema, cities))
    }

    fn listing() -> ListingAttributes {
        ListingAttributes {
            rooms: 3,
            bathrooms: 2,
            furnished: false,
            area: 150.0,
            floor: 1,
            building_age: 4,
            mortgaged: false,
            payment_method: 0,
            parking: false,
            city: "Amman".to_string(),
        }
    }

    #[test]
    fn test_grid_cardinality() {
        assert_eq!(GRID_SIZE, 4320);
        let batch = simulator().encode_grid(&listing()).unwrap();
        assert_eq!(batch.nrows(), 4320);
        assert_eq!(batch.ncols(), 3);
    }

    #[test]
    fn test_fixed_dimensions_held_constant() {
        let batch = simulator().encode_grid(&listing()).unwrap();
        for row in batch.rows() {
            assert_eq!(row[1], 150.0); // area
            assert_eq!(row[2], 1.0); // city_Amman
        }
    }

    #[test]
    fn test_simulation_is_deterministic() {
        let sim = simulator();
        let a = sim.simulate(&listing(), &RoomsModel).unwrap();
        let b = sim.simulate(&listing(), &RoomsModel).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 4320);
    }

    #[test]
    fn test_room_sweep_covers_enumeration() {
        let prices = simulator().simulate(&listing(), &RoomsModel).unwrap();
        let mut seen: Vec<f64> = prices.to_vec();
        seen.sort_by(|a, b| a.partial_cmp(b).unwrap());
        seen.dedup();
        assert_eq!(seen, vec![1000.0, 2000.0, 3000.0, 4000.0]);
    }
}
