use rand::Rng;
use std::num::ParseIntError;
use thiserror::Error;

pub const MIN_DIM: i32 = 3;
pub const MAX_DIM: i32 = 256;
pub const DEFAULT_SCALE: u32 = 25;
pub const MAX_SCALE: u32 = 200;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("{name} value invalid: {value} could not be parsed as an integer")]
    Parse { name: &'static str, value: String },

    #[error("{name} value {value} is out of bounds, must be between {} and {}", MIN_DIM, MAX_DIM)]
    DimOutOfBounds { name: &'static str, value: i32 },

    #[error("scale {0} is out of bounds, must be between 1 and {}", MAX_SCALE)]
    ScaleOutOfBounds(u32),

    #[error("{0} does not look like WxH")]
    BadDims(String),

    #[error("request path {0} does not match /WxH/seed")]
    BadPath(String),
}

fn parse_field<T: std::str::FromStr<Err = ParseIntError>>(name: &'static str, value: &str) -> Result<T, RequestError> {
    value.trim().parse().map_err(|_| RequestError::Parse {
        name,
        value: value.to_string(),
    })
}

/// Parse a `WxH` dimension string such as `20x25`
pub fn parse_dims(s: &str) -> Result<(i32, i32), RequestError> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| RequestError::BadDims(s.to_string()))?;
    Ok((parse_field("x", w)?, parse_field("y", h)?))
}

/// Everything needed to reproduce one rendered maze
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MazeRequest {
    pub width: i32,
    pub height: i32,
    pub scale: u32,
    /// 0 means "not chosen yet"; see `ensure_seed`
    pub seed: u64,
}

impl Default for MazeRequest {
    fn default() -> Self {
        Self {
            width: 20,
            height: 25,
            scale: DEFAULT_SCALE,
            seed: 0,
        }
    }
}

impl MazeRequest {
    /// Build and validate a request from its textual parts
    pub fn from_strings(x: &str, y: &str, scale: &str, seed: &str) -> Result<Self, RequestError> {
        let req = Self {
            width: parse_field("x", x)?,
            height: parse_field("y", y)?,
            scale: parse_field("scale", scale)?,
            seed: parse_field("seed", seed)?,
        };
        req.validate()?;
        Ok(req)
    }

    /// Parse a canonical path, `/WxH/seed` optionally followed by `?s=scale`.
    /// A leading `/api/maze` prefix is accepted.
    pub fn from_path(path: &str) -> Result<Self, RequestError> {
        let bad = || RequestError::BadPath(path.to_string());
        let (route, query) = match path.split_once('?') {
            Some((r, q)) => (r, Some(q)),
            None => (path, None),
        };
        let route = route.strip_prefix("/api/maze").unwrap_or(route);
        let parts: Vec<&str> = route.split('/').filter(|p| !p.is_empty()).collect();
        let [dims, seed] = parts.as_slice() else {
            return Err(bad());
        };
        let (x, y) = dims.split_once(['x', 'X']).ok_or_else(bad)?;

        // last s= wins
        let scale = query
            .into_iter()
            .flat_map(|q| q.split('&'))
            .filter_map(|kv| kv.strip_prefix("s="))
            .last()
            .unwrap_or("25");
        Self::from_strings(x, y, scale, seed)
    }

    pub fn validate(&self) -> Result<(), RequestError> {
        for (name, value) in [("x", self.width), ("y", self.height)] {
            if !(MIN_DIM..=MAX_DIM).contains(&value) {
                return Err(RequestError::DimOutOfBounds { name, value });
            }
        }
        if !(1..=MAX_SCALE).contains(&self.scale) {
            return Err(RequestError::ScaleOutOfBounds(self.scale));
        }
        Ok(())
    }

    /// Replace a zero seed with a random non-zero one so the canonical path
    /// reproduces the maze. Returns true if the seed changed.
    pub fn ensure_seed<R: Rng>(&mut self, rng: &mut R) -> bool {
        if self.seed != 0 {
            return false;
        }
        self.seed = rng.gen_range(1..=i64::MAX as u64);
        true
    }

    pub fn path(&self) -> String {
        format!("/{}x{}/{}?s={}", self.width, self.height, self.seed, self.scale)
    }
}
