use crate::{
    engine::text::Captions,
    foundation::error::{MemeError, MemeResult},
    identity::query::QueryParams,
};

/// Query key naming the source GIF.
pub const KEY_SOURCE: &str = "from";
/// Query key of the top caption.
pub const KEY_TOP: &str = "top";
/// Query key of the bottom caption.
pub const KEY_BOTTOM: &str = "bottom";
/// Query key of the preview width.
pub const KEY_WIDTH: &str = "width";
/// Query key of the preview height.
pub const KEY_HEIGHT: &str = "height";

/// Validated request for a captioned animation.
///
/// Keeps the full parameter set: every parameter takes part in the artifact identity, including
/// ones the engine ignores.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemeRequest {
    source: String,
    captions: Captions,
    params: QueryParams,
}

impl MemeRequest {
    /// Request built from individual fields, as a query string with the same values would be.
    pub fn new(source: &str, top: Option<&str>, bottom: Option<&str>) -> MemeResult<Self> {
        let mut params = QueryParams::new();
        params.append(KEY_SOURCE, source);
        if let Some(top) = top {
            params.append(KEY_TOP, top);
        }
        if let Some(bottom) = bottom {
            params.append(KEY_BOTTOM, bottom);
        }
        Self::from_params(params)
    }

    /// Parse and validate raw query text.
    pub fn from_query(raw: &str) -> MemeResult<Self> {
        Self::from_params(QueryParams::parse(raw))
    }

    /// Validate an already parsed parameter set.
    pub fn from_params(params: QueryParams) -> MemeResult<Self> {
        let source = params
            .get_non_empty(KEY_SOURCE)
            .ok_or_else(|| MemeError::invalid_request("missing source image ('from')"))?
            .to_string();
        let captions = Captions::new(params.get(KEY_TOP), params.get(KEY_BOTTOM));
        if captions.is_empty() {
            return Err(MemeError::invalid_request(
                "at least one of 'top' or 'bottom' must be non-empty",
            ));
        }
        Ok(Self {
            source,
            captions,
            params,
        })
    }

    /// Source image name.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Caption texts.
    pub fn captions(&self) -> &Captions {
        &self.captions
    }

    /// Full parameter set.
    pub fn params(&self) -> &QueryParams {
        &self.params
    }
}

/// Request for a still preview of a source's first frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreviewRequest {
    source: String,
    width: u32,
    height: u32,
    captions: Captions,
}

impl PreviewRequest {
    /// Request from individual fields. Sizes are checked against the service limit later.
    pub fn new(
        source: &str,
        width: u32,
        height: u32,
        top: Option<&str>,
        bottom: Option<&str>,
    ) -> MemeResult<Self> {
        if source.is_empty() {
            return Err(MemeError::invalid_request("missing source image ('from')"));
        }
        Ok(Self {
            source: source.to_string(),
            width,
            height,
            captions: Captions::new(top, bottom),
        })
    }

    /// Parse raw query text; `width` and `height` are required integers.
    pub fn from_query(raw: &str) -> MemeResult<Self> {
        let params = QueryParams::parse(raw);
        let source = params.get(KEY_SOURCE).unwrap_or_default();
        let width = parse_dimension(&params, KEY_WIDTH)?;
        let height = parse_dimension(&params, KEY_HEIGHT)?;
        Self::new(
            source,
            width,
            height,
            params.get(KEY_TOP),
            params.get(KEY_BOTTOM),
        )
    }

    /// Source image name.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Requested width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Requested height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Optional captions burned into the preview.
    pub fn captions(&self) -> &Captions {
        &self.captions
    }
}

fn parse_dimension(params: &QueryParams, key: &str) -> MemeResult<u32> {
    let raw = params
        .get(key)
        .ok_or_else(|| MemeError::invalid_request(format!("missing '{key}'")))?;
    raw.trim()
        .parse::<u32>()
        .map_err(|_| MemeError::invalid_request(format!("'{key}' must be an integer, got '{raw}'")))
}

#[cfg(test)]
#[path = "../../tests/unit/orchestrator/request.rs"]
mod tests;
