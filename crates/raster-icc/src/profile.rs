//! Colour profile handles.
//!
//! [`ColorProfile`] is a cheaply-cloneable shared handle describing a
//! colour space. The handle itself is plain data — standard profiles are
//! recorded by kind, embedded profiles keep their ICC payload — and the
//! Little CMS object is only materialised when a conversion actually runs.
//! That keeps handles `Send + Sync` and lets images travel freely between
//! threads.

use crate::{IccError, IccResult};
use lcms2::{CIExyY, CIExyYTRIPLE, Profile as LcmsProfile, ToneCurve};
use std::sync::Arc;

/// The profiles the engine can describe without ICC payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProfileKind {
    /// IEC 61966-2-1 sRGB.
    Srgb,
    /// sRGB primaries with a linear transfer function.
    LinearSrgb,
    /// ITU-R BT.709.
    Rec709,
    /// Embedded ICC data.
    Custom,
}

#[derive(Debug)]
struct ProfileData {
    kind: ProfileKind,
    icc: Option<Vec<u8>>,
    srgb: bool,
    linear: bool,
    description: String,
}

/// A shared colour-profile handle.
///
/// Cloning retains the same underlying profile; [`same`](Self::same)
/// tests handle identity.
///
/// # Example
///
/// ```rust
/// use raster_icc::ColorProfile;
///
/// let srgb = ColorProfile::srgb();
/// assert!(srgb.is_srgb());
/// assert!(!srgb.is_linear());
///
/// let linear = srgb.linear_sibling().unwrap();
/// assert!(linear.is_linear());
/// ```
#[derive(Debug, Clone)]
pub struct ColorProfile {
    inner: Arc<ProfileData>,
}

impl ColorProfile {
    fn from_data(data: ProfileData) -> Self {
        Self {
            inner: Arc::new(data),
        }
    }

    /// Creates the standard IEC 61966-2-1 sRGB profile.
    pub fn srgb() -> Self {
        Self::from_data(ProfileData {
            kind: ProfileKind::Srgb,
            icc: None,
            srgb: true,
            linear: false,
            description: "sRGB IEC61966-2.1".into(),
        })
    }

    /// Creates a linear profile with sRGB primaries (gamma 1.0).
    ///
    /// Suitable as a working space for filtering and compositing.
    pub fn linear_srgb() -> Self {
        Self::from_data(ProfileData {
            kind: ProfileKind::LinearSrgb,
            icc: None,
            srgb: false,
            linear: true,
            description: "Linear sRGB".into(),
        })
    }

    /// Creates an ITU-R BT.709 profile.
    pub fn rec709() -> Self {
        Self::from_data(ProfileData {
            kind: ProfileKind::Rec709,
            icc: None,
            srgb: false,
            linear: false,
            description: "Rec. 709".into(),
        })
    }

    /// Creates a profile from embedded ICC data.
    ///
    /// The data is validated by parsing it once; the payload is kept and
    /// re-parsed when a conversion runs. Whether the profile is sRGB or
    /// linear is classified from its description.
    ///
    /// # Errors
    ///
    /// Returns [`IccError::InvalidProfile`] when the payload does not
    /// parse.
    pub fn from_icc(data: &[u8]) -> IccResult<Self> {
        let parsed =
            LcmsProfile::new_icc(data).map_err(|e| IccError::InvalidProfile(e.to_string()))?;
        let description = parsed
            .info(lcms2::InfoType::Description, lcms2::Locale::none())
            .unwrap_or_default();
        let lower = description.to_lowercase();
        let linear = lower.contains("linear");
        let srgb = lower.contains("srgb") && !linear;
        Ok(Self::from_data(ProfileData {
            kind: ProfileKind::Custom,
            icc: Some(data.to_vec()),
            srgb,
            linear,
            description,
        }))
    }

    /// Returns `true` if this profile encodes with the sRGB curve.
    #[inline]
    pub fn is_srgb(&self) -> bool {
        self.inner.srgb
    }

    /// Returns `true` if this profile has a linear transfer function.
    #[inline]
    pub fn is_linear(&self) -> bool {
        self.inner.linear
    }

    /// Returns the profile description.
    #[inline]
    pub fn description(&self) -> &str {
        &self.inner.description
    }

    /// Returns a profile with the same primaries and a linear transfer
    /// function, or `None` when the engine cannot derive one.
    ///
    /// sRGB and Rec. 709 share primaries, so both map to
    /// [`linear_srgb`](Self::linear_srgb). Embedded profiles have no
    /// derivable sibling.
    pub fn linear_sibling(&self) -> Option<ColorProfile> {
        match self.inner.kind {
            ProfileKind::Srgb | ProfileKind::Rec709 => Some(Self::linear_srgb()),
            ProfileKind::LinearSrgb | ProfileKind::Custom => None,
        }
    }

    /// Tests whether two handles refer to the same profile.
    ///
    /// Standard profiles of the same kind compare equal even when created
    /// separately; embedded profiles compare by handle identity.
    pub fn same(&self, other: &ColorProfile) -> bool {
        if Arc::ptr_eq(&self.inner, &other.inner) {
            return true;
        }
        self.inner.kind != ProfileKind::Custom && self.inner.kind == other.inner.kind
    }

    /// Materialises the Little CMS profile object.
    pub(crate) fn to_lcms(&self) -> IccResult<LcmsProfile> {
        match self.inner.kind {
            ProfileKind::Srgb => Ok(LcmsProfile::new_srgb()),
            ProfileKind::LinearSrgb => {
                let curve = ToneCurve::new(1.0);
                let curves = [&curve, &curve, &curve];
                LcmsProfile::new_rgb(&d65_white(), &srgb_primaries(), &curves)
                    .map_err(|e| IccError::CreateFailed(e.to_string()))
            }
            ProfileKind::Rec709 => {
                // BT.709 transfer simplified as gamma 2.4, primaries
                // shared with sRGB.
                let curve = ToneCurve::new(2.4);
                let curves = [&curve, &curve, &curve];
                LcmsProfile::new_rgb(&d65_white(), &srgb_primaries(), &curves)
                    .map_err(|e| IccError::CreateFailed(e.to_string()))
            }
            ProfileKind::Custom => {
                let data = self
                    .inner
                    .icc
                    .as_deref()
                    .ok_or_else(|| IccError::CreateFailed("missing ICC payload".into()))?;
                LcmsProfile::new_icc(data).map_err(|e| IccError::InvalidProfile(e.to_string()))
            }
        }
    }

    /// Exports the profile as ICC data.
    ///
    /// # Errors
    ///
    /// Returns [`IccError::CreateFailed`] when serialisation fails.
    pub fn to_icc(&self) -> IccResult<Vec<u8>> {
        if let Some(data) = &self.inner.icc {
            return Ok(data.clone());
        }
        self.to_lcms()?
            .icc()
            .map_err(|e| IccError::CreateFailed(e.to_string()))
    }
}

/// D65 white point.
fn d65_white() -> CIExyY {
    CIExyY {
        x: 0.3127,
        y: 0.3290,
        Y: 1.0,
    }
}

/// sRGB / Rec. 709 primaries.
fn srgb_primaries() -> CIExyYTRIPLE {
    CIExyYTRIPLE {
        Red: CIExyY {
            x: 0.6400,
            y: 0.3300,
            Y: 1.0,
        },
        Green: CIExyY {
            x: 0.3000,
            y: 0.6000,
            Y: 1.0,
        },
        Blue: CIExyY {
            x: 0.1500,
            y: 0.0600,
            Y: 1.0,
        },
    }
}
