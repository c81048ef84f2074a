/*
    SMD, spacecraft mission design
    Copyright (C) 2023 Christopher Rabotin <christopher.rabotin@gmail.com>

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Affero General Public License for more details.

    You should have received a copy of the GNU Affero General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

/// The `RK` trait defines a Runge Kutta integrator by its Butcher tableau.
pub trait RK
where
    Self: Sized,
{
    /// Returns the stages of this integrator (as usize because it's used as indexing)
    fn stages() -> usize;

    /// Returns a pointer to a list of f64 corresponding to the A coefficients of the Butcher table for that RK.
    /// This module only uses the lower triangle, so it is stored row by row from the second stage.
    fn a_coeffs() -> &'static [f64];

    /// Returns a pointer to a list of f64 corresponding to the b_i coefficients of the Butcher table for that RK.
    fn b_coeffs() -> &'static [f64];
}

/// `RK4Fixed` is a fixed step RK4 (or "the" RK4).
pub struct RK4Fixed {}

impl RK for RK4Fixed {
    fn stages() -> usize {
        4
    }

    fn a_coeffs() -> &'static [f64] {
        &[0.5, 0.0, 0.5, 0.0, 0.0, 1.0]
    }

    fn b_coeffs() -> &'static [f64] {
        &[1.0 / 6.0, 1.0 / 3.0, 1.0 / 3.0, 1.0 / 6.0]
    }
}

#[test]
fn rk4_tableau() {
    let stages = RK4Fixed::stages();
    assert_eq!(RK4Fixed::a_coeffs().len(), stages * (stages - 1) / 2);
    assert_eq!(RK4Fixed::b_coeffs().len(), stages);
    assert!((RK4Fixed::b_coeffs().iter().sum::<f64>() - 1.0).abs() < f64::EPSILON);
}
