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

use super::ephemeris::MeanElements;
use crate::linalg::Vector3;
use crate::time::Epoch;
use serde_derive::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a celestial body known to the registry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bodies {
    Sun,
    Mercury,
    Venus,
    Earth,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
}

impl Bodies {
    /// Returns the static definition of this body.
    pub fn body(self) -> &'static CelestialBody {
        &REGISTRY[self as usize]
    }

    /// Returns all of the bodies of the registry, the Sun first.
    pub fn all() -> [Self; 9] {
        [
            Self::Sun,
            Self::Mercury,
            Self::Venus,
            Self::Earth,
            Self::Mars,
            Self::Jupiter,
            Self::Saturn,
            Self::Uranus,
            Self::Neptune,
        ]
    }

    pub fn is_sun(self) -> bool {
        self == Self::Sun
    }
}

impl fmt::Display for Bodies {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.body().name)
    }
}

/// A celestial body: gravitational parameter, shape, sphere of influence and heliocentric ephemeris.
#[derive(Debug, PartialEq)]
pub struct CelestialBody {
    pub id: Bodies,
    pub name: &'static str,
    /// Gravitational parameter in km^3/s^2
    pub gm: f64,
    /// Mean equatorial radius in km
    pub radius: f64,
    /// Radius of the sphere of influence in km, None for the Sun
    pub soi: Option<f64>,
    /// Axial tilt with respect to the ecliptic in degrees
    pub tilt_deg: f64,
    pub j2: f64,
    /// The body around which this one orbits, None for the Sun
    pub parent: Option<Bodies>,
    ephem: Option<MeanElements>,
}

impl CelestialBody {
    /// Returns the heliocentric position (km) and velocity (km/s) of this body in the ecliptic J2000 frame.
    /// The Sun is the origin of that frame, so its state is always zero.
    pub fn helio_state(&self, epoch: Epoch) -> (Vector3<f64>, Vector3<f64>) {
        match &self.ephem {
            Some(ephem) => ephem.state(epoch, Bodies::Sun.body().gm),
            None => (Vector3::zeros(), Vector3::zeros()),
        }
    }

    /// Returns the axial tilt in radians
    pub fn tilt(&self) -> f64 {
        self.tilt_deg.to_radians()
    }

    /// Returns whether the provided radius (km) is outside of this body's sphere of influence.
    pub fn outside_soi(&self, rmag: f64) -> bool {
        match self.soi {
            Some(soi) => rmag > soi,
            None => false,
        }
    }
}

static REGISTRY: [CelestialBody; 9] = [
    CelestialBody {
        id: Bodies::Sun,
        name: "Sun",
        gm: 1.327_124_400_18e11,
        radius: 695_700.0,
        soi: None,
        tilt_deg: 0.0,
        j2: 0.0,
        parent: None,
        ephem: None,
    },
    CelestialBody {
        id: Bodies::Mercury,
        name: "Mercury",
        gm: 2.2032e4,
        radius: 2_439.7,
        soi: Some(112_408.0),
        tilt_deg: 0.034,
        j2: 0.0,
        parent: Some(Bodies::Sun),
        ephem: Some(MeanElements::new(
            0.387_099_27,
            0.205_635_93,
            7.004_979_02,
            252.250_323_50,
            77.457_796_28,
            48.330_765_93,
            [
                0.000_000_37,
                0.000_019_06,
                -0.005_947_49,
                149_472.674_111_75,
                0.160_476_89,
                -0.125_340_81,
            ],
        )),
    },
    CelestialBody {
        id: Bodies::Venus,
        name: "Venus",
        gm: 3.248_59e5,
        radius: 6_051.8,
        soi: Some(616_000.0),
        tilt_deg: 177.36,
        j2: 4.458e-6,
        parent: Some(Bodies::Sun),
        ephem: Some(MeanElements::new(
            0.723_335_66,
            0.006_776_72,
            3.394_676_05,
            181.979_099_50,
            131.602_467_18,
            76.679_842_55,
            [
                0.000_003_90,
                -0.000_041_07,
                -0.000_788_90,
                58_517.815_387_29,
                0.002_683_29,
                -0.277_694_18,
            ],
        )),
    },
    CelestialBody {
        id: Bodies::Earth,
        name: "Earth",
        gm: 3.986_004_33e5,
        radius: 6_378.136_3,
        soi: Some(924_645.0),
        tilt_deg: 23.4393,
        j2: 1.082_626_9e-3,
        parent: Some(Bodies::Sun),
        // Earth-Moon barycenter
        ephem: Some(MeanElements::new(
            1.000_002_61,
            0.016_711_23,
            -0.000_015_31,
            100.464_571_66,
            102.937_681_93,
            0.0,
            [
                0.000_005_62,
                -0.000_043_92,
                -0.012_946_68,
                35_999.372_449_81,
                0.323_273_64,
                0.0,
            ],
        )),
    },
    CelestialBody {
        id: Bodies::Mars,
        name: "Mars",
        gm: 4.282_83e4,
        radius: 3_396.19,
        soi: Some(576_000.0),
        tilt_deg: 25.19,
        j2: 1.964e-3,
        parent: Some(Bodies::Sun),
        ephem: Some(MeanElements::new(
            1.523_710_34,
            0.093_394_10,
            1.849_691_42,
            -4.553_432_05,
            -23.943_629_59,
            49.559_538_91,
            [
                0.000_018_47,
                0.000_078_82,
                -0.008_131_31,
                19_140.302_684_99,
                0.444_410_88,
                -0.292_573_43,
            ],
        )),
    },
    CelestialBody {
        id: Bodies::Jupiter,
        name: "Jupiter",
        gm: 1.266_865_34e8,
        radius: 71_492.0,
        soi: Some(48.2e6),
        tilt_deg: 3.13,
        j2: 1.4736e-2,
        parent: Some(Bodies::Sun),
        ephem: Some(MeanElements::new(
            5.202_887_00,
            0.048_386_24,
            1.304_396_95,
            34.396_440_51,
            14.728_479_83,
            100.473_909_09,
            [
                -0.000_116_07,
                -0.000_132_53,
                -0.001_837_14,
                3_034.746_127_75,
                0.212_526_68,
                0.204_691_06,
            ],
        )),
    },
    CelestialBody {
        id: Bodies::Saturn,
        name: "Saturn",
        gm: 3.793_118_7e7,
        radius: 60_268.0,
        soi: Some(54.8e6),
        tilt_deg: 26.73,
        j2: 1.6298e-2,
        parent: Some(Bodies::Sun),
        ephem: Some(MeanElements::new(
            9.536_675_94,
            0.053_861_79,
            2.485_991_87,
            49.954_244_23,
            92.598_878_31,
            113.662_424_48,
            [
                -0.001_250_60,
                -0.000_509_91,
                0.001_936_09,
                1_222.493_622_01,
                -0.418_972_16,
                -0.288_677_94,
            ],
        )),
    },
    CelestialBody {
        id: Bodies::Uranus,
        name: "Uranus",
        gm: 5.793_939e6,
        radius: 25_559.0,
        soi: Some(51.8e6),
        tilt_deg: 97.77,
        j2: 3.343e-3,
        parent: Some(Bodies::Sun),
        ephem: Some(MeanElements::new(
            19.189_164_64,
            0.047_257_44,
            0.772_637_83,
            313.238_104_51,
            170.954_276_30,
            74.016_925_03,
            [
                -0.001_961_76,
                -0.000_043_97,
                -0.002_429_39,
                428.482_027_85,
                0.408_052_81,
                0.042_405_89,
            ],
        )),
    },
    CelestialBody {
        id: Bodies::Neptune,
        name: "Neptune",
        gm: 6.836_529e6,
        radius: 24_764.0,
        soi: Some(86.8e6),
        tilt_deg: 28.32,
        j2: 3.411e-3,
        parent: Some(Bodies::Sun),
        ephem: Some(MeanElements::new(
            30.069_922_76,
            0.008_590_48,
            1.770_043_47,
            -55.120_029_69,
            44.964_762_27,
            131.784_225_74,
            [
                0.000_262_91,
                0.000_051_05,
                0.000_353_72,
                218.459_453_25,
                -0.322_414_64,
                -0.005_086_64,
            ],
        )),
    },
];
