use std::fmt;

/// A packed liveness tag for a slot: a 31-bit serial number plus an `exists` flag in the high bit.
///
/// Every transition through [`create`](Version::create) or [`destroy`](Version::destroy) bumps the
/// serial, so a version observed for a slot is never observed again for that slot (until the
/// serial wraps after 2^31 transitions). Handles store the version they were issued with and
/// compare it to the slot's current version to detect use after free.
#[derive(Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(u32);

impl Version {
    /// The flag bit marking a live slot.
    const EXISTS: u32 = 1 << 31;

    /// The bits holding the serial number.
    const SERIAL: u32 = Self::EXISTS - 1;

    /// A dead version with serial zero, the state of every slot before first use.
    pub const DEAD: Self = Self(0);

    /// Does the slot tagged with this version currently hold something?
    #[inline]
    pub const fn exists(self) -> bool {
        self.0 & Self::EXISTS != 0
    }

    /// The serial number of this version.
    #[inline]
    pub const fn serial(self) -> u32 {
        self.0 & Self::SERIAL
    }

    /// Mark the slot live and advance the serial. Returns the new version.
    #[inline]
    pub fn create(&mut self) -> Self {
        self.0 = Self::EXISTS | self.next_serial();
        *self
    }

    /// Mark the slot dead and advance the serial. Returns the new version.
    #[inline]
    pub fn destroy(&mut self) -> Self {
        self.0 = self.next_serial();
        *self
    }

    #[inline]
    const fn next_serial(self) -> u32 {
        self.serial().wrapping_add(1) & Self::SERIAL
    }
}

impl fmt::Debug for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Version")
            .field("serial", &self.serial())
            .field("exists", &self.exists())
            .finish()
    }
}
