//! A gap buffer over single byte units with one active cursor.
//!
//! ### References
//! - https://www.cs.unm.edu/~crowley/papers/sds.pdf
//! - https://coredumped.dev/2023/08/09/text-showdown-gap-buffers-vs-ropes/
use crate::{config::Config, Error};
use std::{
    cmp::{min, Ordering},
    ffi::CStr,
    fmt,
    iter::{Chain, Copied},
    slice,
};
use tracing::{debug, trace};

/// Number of usable units allocated by [GapBuffer::new].
pub const DEFAULT_CAPACITY: usize = 10;

/// Marker rendered once per gap unit by [GapBuffer::render_debug] unless configured otherwise.
pub const DEFAULT_GAP_MARKER: &str = " _ ";

/// Iterator over the logical content of a [GapBuffer].
pub type Iter<'a> = Chain<Copied<slice::Iter<'a, u8>>, Copied<slice::Iter<'a, u8>>>;

/// Allocate zeroed storage of exactly `cap` units without aborting on failure.
fn try_alloc(cap: usize) -> Result<Box<[u8]>, Error> {
    let mut v = Vec::new();
    v.try_reserve_exact(cap)
        .map_err(|_| Error::AllocationFailed { requested: cap })?;
    v.resize(cap, 0);

    Ok(v.into_boxed_slice())
}

/// A contiguous, growable buffer of bytes with a gap of free space kept at the cursor.
///
/// The final unit of the allocation is a NUL sentinel that never forms part of the text, which
/// is what allows [GapBuffer::as_c_str] to hand out a NUL terminated view without copying.
///
/// ```text
///          gap_start      gap_end
///              v             v
///   [h, e, l, _, _, _, _, _, l, o, \0]
///    <-left->  <-- gap -->  <right>  ^ sentinel
/// ```
///
/// Requests to move or delete further than the available text are clamped to the text that
/// exists rather than rejected: each of those operations returns how far it actually went.
///
/// ```
/// use gapbuf::GapBuffer;
///
/// let mut gb = GapBuffer::try_from("hello")?;
/// assert_eq!(gb.move_cursor_left(100), 5);
/// assert_eq!(gb.cursor(), 0);
/// assert_eq!(gb.delete_after_cursor(2), 2);
/// assert_eq!(gb.to_string(), "llo");
/// # Ok::<(), gapbuf::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct GapBuffer {
    /// the raw data being stored (content, the gap and the sentinel)
    data: Box<[u8]>,
    /// offset to the first unit in the gap
    gap_start: usize,
    /// offset one past the last unit in the gap (the first unit of the right segment)
    gap_end: usize,
    gap_marker: String,
}

/// An empty buffer with no usable capacity: the first insert will allocate.
impl Default for GapBuffer {
    fn default() -> Self {
        Self {
            data: Box::new([0]),
            gap_start: 0,
            gap_end: 0,
            gap_marker: DEFAULT_GAP_MARKER.to_string(),
        }
    }
}

impl GapBuffer {
    /// Create an empty buffer able to hold [DEFAULT_CAPACITY] units before it needs to grow.
    pub fn new() -> Result<Self, Error> {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create an empty buffer able to hold `n` units before it needs to grow. The gap spans the
    /// whole usable region.
    ///
    /// # Errors
    /// Returns [Error::AllocationFailed] if storage for `n + 1` units can not be obtained.
    pub fn with_capacity(n: usize) -> Result<Self, Error> {
        let cap = n.checked_add(1).ok_or(Error::AllocationFailed {
            requested: usize::MAX,
        })?;

        Ok(Self {
            data: try_alloc(cap)?,
            gap_start: 0,
            gap_end: n,
            gap_marker: DEFAULT_GAP_MARKER.to_string(),
        })
    }

    /// Create an empty buffer using the initial capacity and gap marker from `cfg`.
    pub fn with_config(cfg: &Config) -> Result<Self, Error> {
        let mut gb = Self::with_capacity(cfg.initial_capacity)?;
        gb.gap_marker.clone_from(&cfg.gap_marker);

        Ok(gb)
    }

    /// Total number of units in the allocation, including the trailing sentinel.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Number of units that can be stored before the buffer has to grow.
    #[inline]
    pub fn usable_capacity(&self) -> usize {
        self.data.len() - 1
    }

    /// Number of units in the gap
    #[inline]
    pub fn gap_len(&self) -> usize {
        self.gap_end - self.gap_start
    }

    /// The current length of the text (i.e. not including the gap or the sentinel)
    #[inline]
    pub fn len(&self) -> usize {
        self.usable_capacity() - self.gap_len()
    }

    /// Whether or not the visible buffer contents are empty.
    /// This can return true while there is deleted data sitting in the gap.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The logical position of the cursor: the number of units before the gap.
    #[inline]
    pub fn cursor(&self) -> usize {
        self.gap_start
    }

    /// Offset one past the final unit of the gap within the raw storage.
    #[inline]
    pub fn gap_end(&self) -> usize {
        self.gap_end
    }

    #[inline]
    fn right_len(&self) -> usize {
        self.usable_capacity() - self.gap_end
    }

    /// Insert a single unit at the cursor, leaving the cursor after it.
    ///
    /// O(1) unless the gap is empty, in which case the buffer is grown first.
    ///
    /// # Errors
    /// Returns [Error::AllocationFailed] if growing was required and failed. The buffer is left
    /// unmodified in that case.
    pub fn insert_char(&mut self, ch: u8) -> Result<(), Error> {
        if self.gap_len() == 0 {
            self.grow()?;
        }

        self.data[self.gap_start] = ch;
        self.gap_start += 1;

        Ok(())
    }

    /// Insert a run of units at the cursor as a single copy, leaving the cursor after them.
    ///
    /// This has the same effect as calling [insert_char](GapBuffer::insert_char) for each unit
    /// in turn, including the final capacity if growth was needed.
    ///
    /// # Errors
    /// Returns [Error::AllocationFailed] if growing was required and failed. The buffer is left
    /// unmodified in that case.
    pub fn insert_text(&mut self, s: &[u8]) -> Result<(), Error> {
        if let Some((from, to)) = self.insert_text_unlogged(s)? {
            debug!(from, to, "growing gap buffer");
        }

        Ok(())
    }

    /// Insert without emitting a tracing event if the buffer grows, returning the old and new
    /// capacities when it did.
    ///
    /// [LogBuffer](crate::LogBuffer) writes through this while holding the lock that the
    /// subscriber would need in order to record the event.
    pub(crate) fn insert_text_unlogged(
        &mut self,
        s: &[u8],
    ) -> Result<Option<(usize, usize)>, Error> {
        let len = s.len();
        let grown = if len > self.gap_len() {
            Some(self.grow_to_fit(len)?)
        } else {
            None
        };

        self.data[self.gap_start..self.gap_start + len].copy_from_slice(s);
        self.gap_start += len;

        Ok(grown)
    }

    /// Insert the bytes of `s` at the cursor. See [insert_text](GapBuffer::insert_text).
    pub fn insert_str(&mut self, s: &str) -> Result<(), Error> {
        self.insert_text(s.as_bytes())
    }

    /// Move the cursor `n` units towards the start of the buffer, carrying the units it steps
    /// over to the other side of the gap. Returns the distance actually moved, which is less
    /// than `n` if there were fewer than `n` units before the cursor.
    pub fn move_cursor_left(&mut self, n: usize) -> usize {
        let n = clamp_request("move_cursor_left", n, self.gap_start);

        self.data
            .copy_within(self.gap_start - n..self.gap_start, self.gap_end - n);
        self.gap_start -= n;
        self.gap_end -= n;

        n
    }

    /// Move the cursor `n` units towards the end of the buffer, carrying the units it steps
    /// over to the other side of the gap. Returns the distance actually moved, which is less
    /// than `n` if there were fewer than `n` units after the cursor.
    pub fn move_cursor_right(&mut self, n: usize) -> usize {
        let n = clamp_request("move_cursor_right", n, self.right_len());

        self.data
            .copy_within(self.gap_end..self.gap_end + n, self.gap_start);
        self.gap_start += n;
        self.gap_end += n;

        n
    }

    /// Move the cursor to an absolute position within the text, clamped to [len](GapBuffer::len).
    /// Returns the new cursor position.
    pub fn set_cursor(&mut self, idx: usize) -> usize {
        let idx = min(idx, self.len());

        match idx.cmp(&self.gap_start) {
            Ordering::Equal => (),
            Ordering::Less => {
                self.move_cursor_left(self.gap_start - idx);
            }
            Ordering::Greater => {
                self.move_cursor_right(idx - self.gap_start);
            }
        }

        self.gap_start
    }

    /// Backspace: remove up to `n` units immediately before the cursor by widening the gap.
    /// Returns the number of units removed.
    ///
    /// Removed units are not overwritten, they are simply no longer part of the text.
    pub fn delete_before_cursor(&mut self, n: usize) -> usize {
        let n = clamp_request("delete_before_cursor", n, self.gap_start);
        self.gap_start -= n;

        n
    }

    /// Forward delete: remove up to `n` units immediately after the cursor by widening the gap.
    /// Returns the number of units removed.
    pub fn delete_after_cursor(&mut self, n: usize) -> usize {
        let n = clamp_request("delete_after_cursor", n, self.right_len());
        self.gap_end += n;

        n
    }

    /// Remove all text while retaining the current allocation.
    pub fn clear(&mut self) {
        self.gap_start = 0;
        self.gap_end = self.usable_capacity();
    }

    /// Double the usable capacity of the buffer, giving a new capacity of `2 * capacity - 1`
    /// once the sentinel is accounted for. The text and cursor position are unchanged.
    ///
    /// A buffer with no usable capacity grows to hold a single unit.
    ///
    /// # Errors
    /// Returns [Error::AllocationFailed] if the new storage can not be obtained. The buffer is
    /// left unmodified in that case.
    pub fn grow(&mut self) -> Result<(), Error> {
        let usable = next_usable(self.usable_capacity())?;
        let (from, to) = self.reallocate(usable + 1)?;
        debug!(from, to, "growing gap buffer");

        Ok(())
    }

    /// Compute the capacity that repeated calls to [grow](GapBuffer::grow) would reach in order
    /// to fit `n` more units and move to it with a single reallocation.
    fn grow_to_fit(&mut self, n: usize) -> Result<(usize, usize), Error> {
        let len = self.len();
        let mut usable = self.usable_capacity();
        while usable - len < n {
            usable = next_usable(usable)?;
        }

        self.reallocate(usable + 1)
    }

    /// Move to storage of `cap` units, returning the old and new capacities.
    fn reallocate(&mut self, cap: usize) -> Result<(usize, usize), Error> {
        let right_len = self.right_len();
        let mut data = try_alloc(cap)?;
        let gap_end = cap - 1 - right_len;

        data[..self.gap_start].copy_from_slice(&self.data[..self.gap_start]);
        data[gap_end..cap - 1].copy_from_slice(&self.data[self.gap_end..self.gap_end + right_len]);

        let from = self.data.len();
        self.data = data;
        self.gap_end = gap_end;

        Ok((from, cap))
    }

    /// The text before and after the gap.
    pub fn segments(&self) -> (&[u8], &[u8]) {
        (
            &self.data[..self.gap_start],
            &self.data[self.gap_end..self.usable_capacity()],
        )
    }

    /// Iterate over the units of the text in order.
    pub fn iter(&self) -> Iter<'_> {
        let (left, right) = self.segments();
        left.iter().copied().chain(right.iter().copied())
    }

    /// The unit at logical position `idx`, or None if `idx` is past the end of the text.
    pub fn get(&self, idx: usize) -> Option<u8> {
        if idx < self.gap_start {
            Some(self.data[idx])
        } else if idx < self.len() {
            Some(self.data[idx + self.gap_len()])
        } else {
            None
        }
    }

    /// A copy of the text, left segment followed by right segment.
    pub fn render_text(&self) -> Vec<u8> {
        let (left, right) = self.segments();
        let mut v = Vec::with_capacity(self.len());
        v.extend_from_slice(left);
        v.extend_from_slice(right);

        v
    }

    /// The text with the gap made visible: one gap marker is rendered in place of each unit of
    /// the gap. Intended for diagnostics only.
    pub fn render_debug(&self) -> String {
        let (left, right) = self.segments();
        let mut s = String::with_capacity(self.len() + self.gap_len() * self.gap_marker.len());
        s.push_str(&String::from_utf8_lossy(left));
        s.push_str(&self.gap_marker.repeat(self.gap_len()));
        s.push_str(&String::from_utf8_lossy(right));

        s
    }

    /// A NUL terminated view of the text.
    ///
    /// The gap is moved to the start of the buffer so that the text runs directly into the
    /// sentinel, meaning that this moves the cursor to 0.
    ///
    /// # Errors
    /// Returns [Error::InteriorNul] if the text itself contains a NUL.
    pub fn as_c_str(&mut self) -> Result<&CStr, Error> {
        self.set_cursor(0);
        let bytes = &self.data[self.gap_end..];

        CStr::from_bytes_with_nul(bytes).map_err(|_| {
            Error::InteriorNul(bytes.iter().position(|&b| b == 0).unwrap_or_default())
        })
    }
}

/// The usable capacity that follows `usable` when growing.
fn next_usable(usable: usize) -> Result<usize, Error> {
    if usable == 0 {
        return Ok(1);
    }

    usable
        .checked_mul(2)
        .ok_or(Error::AllocationFailed {
            requested: usize::MAX,
        })
}

fn clamp_request(op: &'static str, n: usize, available: usize) -> usize {
    if n > available {
        trace!(op, requested = n, available, "clamping out of range request");
    }

    min(n, available)
}

impl PartialEq for GapBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl Eq for GapBuffer {}

impl fmt::Display for GapBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.render_text()))
    }
}

impl<'a> IntoIterator for &'a GapBuffer {
    type Item = u8;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// The buffer is sized to exactly fit the text with the cursor left at the end.
impl TryFrom<&[u8]> for GapBuffer {
    type Error = Error;

    fn try_from(s: &[u8]) -> Result<Self, Self::Error> {
        let mut gb = Self::with_capacity(s.len())?;
        gb.insert_text(s)?;

        Ok(gb)
    }
}

impl TryFrom<&str> for GapBuffer {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::try_from(s.as_bytes())
    }
}
