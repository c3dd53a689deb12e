use serde::{Deserialize, Serialize};

/// Reference ellipsoid given by its semi-major axis and flattening.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    pub a: f64,
    pub f: f64,
}

pub const WGS84: Ellipsoid = Ellipsoid {
    a: 6_378_137.0,
    f: 1.0 / 298.257_223_563,
};

/// China Geodetic Coordinate System 2000, differs from WGS84 only in `f`.
pub const CGCS2000: Ellipsoid = Ellipsoid {
    a: 6_378_137.0,
    f: 1.0 / 298.257_222_101,
};

impl Ellipsoid {
    pub fn b(&self) -> f64 {
        self.a * (1.0 - self.f)
    }

    /// First eccentricity squared.
    pub fn e2(&self) -> f64 {
        self.f * (2.0 - self.f)
    }

    /// Second eccentricity squared.
    pub fn ep2(&self) -> f64 {
        let e2 = self.e2();
        e2 / (1.0 - e2)
    }

    fn prime_vertical_radius(&self, sin_lat: f64) -> f64 {
        self.a / (1.0 - self.e2() * sin_lat * sin_lat).sqrt()
    }
}

/// An Earth-centred, Earth-fixed position in meters.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Cartesian3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Cartesian3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Cartesian3 { x, y, z }
    }

    /// Position of a WGS84 longitude/latitude (degrees) at `height` meters.
    pub fn from_degrees(lon: f64, lat: f64, height: f64) -> Self {
        let ellipsoid = WGS84;
        let (sin_lat, cos_lat) = lat.to_radians().sin_cos();
        let (sin_lon, cos_lon) = lon.to_radians().sin_cos();
        let n = ellipsoid.prime_vertical_radius(sin_lat);
        Cartesian3 {
            x: (n + height) * cos_lat * cos_lon,
            y: (n + height) * cos_lat * sin_lon,
            z: (n * (1.0 - ellipsoid.e2()) + height) * sin_lat,
        }
    }

    fn magnitude_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }
}

/// A geodetic position in degrees.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub lon: f64,
    pub lat: f64,
    pub height: f64,
}

impl From<Location> for (f64, f64) {
    fn from(loc: Location) -> Self {
        (loc.lon, loc.lat)
    }
}

/// Points closer than this (squared, in m²) to the Earth's centre have no
/// geodetic position.
const CENTER_TOLERANCE_SQUARED: f64 = 0.1;

/// Geodetic WGS84 position of an Earth-centred point, using Heikkinen's
/// closed-form solution. `None` near the centre of the ellipsoid.
pub fn to_location(position: &Cartesian3) -> Option<Location> {
    if !(position.magnitude_squared() >= CENTER_TOLERANCE_SQUARED) {
        return None;
    }
    let ellipsoid = WGS84;
    let Cartesian3 { x, y, z } = *position;
    let a = ellipsoid.a;
    let b = ellipsoid.b();
    let e2 = ellipsoid.e2();
    let e4 = e2 * e2;

    let p = (x * x + y * y).sqrt();
    let big_f = 54.0 * b * b * z * z;
    let g = p * p + (1.0 - e2) * z * z - e2 * (a * a - b * b);
    let c = e4 * big_f * p * p / (g * g * g);
    let s = (1.0 + c + (c * c + 2.0 * c).sqrt()).cbrt();
    let k = s + 1.0 + 1.0 / s;
    let big_p = big_f / (3.0 * k * k * g * g);
    let q = (1.0 + 2.0 * e4 * big_p).sqrt();
    let r0 = -(big_p * e2 * p) / (1.0 + q)
        + (0.5 * a * a * (1.0 + 1.0 / q)
            - big_p * (1.0 - e2) * z * z / (q * (1.0 + q))
            - 0.5 * big_p * p * p)
            .sqrt();
    let u = ((p - e2 * r0).powi(2) + z * z).sqrt();
    let v = ((p - e2 * r0).powi(2) + (1.0 - e2) * z * z).sqrt();
    let z0 = b * b * z / (a * v);

    let location = Location {
        lon: y.atan2(x).to_degrees(),
        lat: (z + ellipsoid.ep2() * z0).atan2(p).to_degrees(),
        height: u * (1.0 - b * b / (a * v)),
    };
    if location.lon.is_finite() && location.lat.is_finite() {
        Some(location)
    } else {
        None
    }
}

/// Append a copy of the first coordinate unless the ring already ends with it.
pub fn close_ring(ring: &mut Vec<(f64, f64)>) {
    let first = match ring.first() {
        Some(&first) => first,
        None => return,
    };
    if ring.last() != Some(&first) {
        ring.push(first);
    }
}

/// Transverse Mercator projection of a single zone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransverseMercator {
    pub ellipsoid: Ellipsoid,
    pub central_meridian: f64,
    pub scale: f64,
    pub false_easting: f64,
    pub false_northing: f64,
}

/// EPSG:4513, CGCS2000 / 3-degree Gauss-Kruger zone 25.
pub const GAUSS_KRUGER_ZONE_25: TransverseMercator = TransverseMercator {
    ellipsoid: CGCS2000,
    central_meridian: 75.0,
    scale: 1.0,
    false_easting: 25_500_000.0,
    false_northing: 0.0,
};

impl TransverseMercator {
    fn meridian_arc(&self, lat: f64) -> f64 {
        let e2 = self.ellipsoid.e2();
        let e4 = e2 * e2;
        let e6 = e4 * e2;
        self.ellipsoid.a
            * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * lat
                - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * lat).sin()
                + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * lat).sin()
                - (35.0 * e6 / 3072.0) * (6.0 * lat).sin())
    }

    /// Project longitude/latitude degrees to easting/northing meters.
    pub fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        let ep2 = self.ellipsoid.ep2();
        let phi = lat.to_radians();
        let (sin_phi, cos_phi) = phi.sin_cos();
        let tan_phi = phi.tan();

        let n = self.ellipsoid.prime_vertical_radius(sin_phi);
        let t = tan_phi * tan_phi;
        let c = ep2 * cos_phi * cos_phi;
        let a = (lon - self.central_meridian).to_radians() * cos_phi;
        let m = self.meridian_arc(phi);

        let easting = self.false_easting
            + self.scale
                * n
                * (a + (1.0 - t + c) * a.powi(3) / 6.0
                    + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep2) * a.powi(5) / 120.0);
        let northing = self.false_northing
            + self.scale
                * (m + n
                    * tan_phi
                    * (a * a / 2.0
                        + (5.0 - t + 9.0 * c + 4.0 * c * c) * a.powi(4) / 24.0
                        + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep2) * a.powi(6)
                            / 720.0));
        (easting, northing)
    }
}
