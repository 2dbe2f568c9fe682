use crate::error::ValidationError;
use crate::sprite_direction::SpriteDirection;

/// Named sequence of directions sharing one source image and timing.
///
/// `frame_on_loop` is `-1` (stop on the last frame) or the frame index the
/// animation restarts from; a looping animation needs a non-zero delay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteAnimation {
    name: String,
    image: String,
    frame_delay: i32,
    frame_on_loop: i32,
    directions: Vec<SpriteDirection>,
}

impl Default for SpriteAnimation {
    fn default() -> Self {
        Self {
            name: "anim_0".into(),
            image: String::new(),
            frame_delay: 0,
            frame_on_loop: -1,
            directions: Vec::new(),
        }
    }
}

impl SpriteAnimation {
    pub fn new(
        name: impl Into<String>,
        image: impl Into<String>,
        frame_delay: i32,
        frame_on_loop: i32,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ValidationError::EmptyAnimationName);
        }
        let mut animation = Self {
            name,
            image: image.into(),
            ..Self::default()
        };
        animation.set_frame_delay(frame_delay)?;
        animation.set_frame_on_loop(frame_on_loop)?;
        Ok(animation)
    }

    /// Copy stored under another name. The name is not checked here; the
    /// owning sprite validates names before storing.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn frame_delay(&self) -> i32 {
        self.frame_delay
    }

    pub fn frame_on_loop(&self) -> i32 {
        self.frame_on_loop
    }

    pub fn set_image(&mut self, image: impl Into<String>) {
        self.image = image.into();
    }

    /// A zero delay disables looping, so `frame_on_loop` drops back to `-1`.
    pub fn set_frame_delay(&mut self, frame_delay: i32) -> Result<(), ValidationError> {
        if frame_delay < 0 {
            return Err(ValidationError::NegativeFrameDelay);
        }
        self.frame_delay = frame_delay;
        if frame_delay == 0 {
            self.frame_on_loop = -1;
        }
        Ok(())
    }

    pub fn set_frame_on_loop(&mut self, frame_on_loop: i32) -> Result<(), ValidationError> {
        if frame_on_loop < -1 {
            return Err(ValidationError::FrameOnLoopBelowMinimum);
        }
        if self.frame_delay == 0 && frame_on_loop != -1 {
            return Err(ValidationError::FrameOnLoopWithoutDelay);
        }
        self.frame_on_loop = frame_on_loop;
        Ok(())
    }

    pub fn direction_count(&self) -> usize {
        self.directions.len()
    }

    pub fn has_direction(&self, index: usize) -> bool {
        index < self.directions.len()
    }

    pub fn directions(&self) -> &[SpriteDirection] {
        &self.directions
    }

    pub fn direction(&self, index: usize) -> Result<&SpriteDirection, ValidationError> {
        self.directions
            .get(index)
            .ok_or(ValidationError::DirectionNotFound(index))
    }

    /// Largest frame count over all directions, 0 without directions.
    pub fn max_frames(&self) -> i32 {
        self.directions.iter().map(SpriteDirection::frames).max().unwrap_or(0)
    }

    /// Appends `direction` and returns its index.
    pub fn add_direction(&mut self, direction: SpriteDirection) -> usize {
        self.directions.push(direction);
        self.directions.len() - 1
    }

    /// Replaces the direction at `index`, or appends when `index` is past the end.
    /// Returns the index the direction ended up at.
    pub fn set_direction(&mut self, index: usize, direction: SpriteDirection) -> usize {
        match self.directions.get_mut(index) {
            Some(slot) => {
                *slot = direction;
                index
            }
            None => self.add_direction(direction),
        }
    }

    pub fn remove_direction(&mut self, index: usize) -> Result<SpriteDirection, ValidationError> {
        if !self.has_direction(index) {
            return Err(ValidationError::DirectionNotFound(index));
        }
        Ok(self.directions.remove(index))
    }

    pub fn swap_direction(&mut self, a: usize, b: usize) -> Result<(), ValidationError> {
        for index in [a, b] {
            if !self.has_direction(index) {
                return Err(ValidationError::DirectionNotFound(index));
            }
        }
        self.directions.swap(a, b);
        Ok(())
    }

    /// Header line followed by one line per direction.
    pub fn to_data(&self) -> String {
        let mut data = format!(
            "{} {} {} {} {}",
            self.name,
            self.image,
            self.directions.len(),
            self.frame_delay,
            self.frame_on_loop
        );
        for direction in &self.directions {
            data.push('\n');
            data.push_str(&direction.to_data());
        }
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Point, Rect};
    use pretty_assertions::assert_eq;

    fn walking() -> SpriteAnimation {
        let mut anim = SpriteAnimation::new("walking", "hero.png", 100, 0).unwrap();
        anim.add_direction(
            SpriteDirection::new(Rect::new(0, 0, 16, 24), Point::new(8, 21), 8, 8).unwrap(),
        );
        anim.add_direction(
            SpriteDirection::new(Rect::new(0, 24, 16, 24), Point::new(8, 21), 4, 4).unwrap(),
        );
        anim
    }

    #[test]
    fn zero_delay_resets_loop_frame() {
        let mut anim = walking();
        assert_eq!(anim.frame_on_loop(), 0);
        anim.set_frame_delay(0).unwrap();
        assert_eq!(anim.frame_on_loop(), -1);
        assert_eq!(
            anim.set_frame_on_loop(2),
            Err(ValidationError::FrameOnLoopWithoutDelay)
        );
        assert_eq!(
            SpriteAnimation::new("x", "", -5, -1),
            Err(ValidationError::NegativeFrameDelay)
        );
        assert_eq!(
            SpriteAnimation::new("x", "", 10, -2),
            Err(ValidationError::FrameOnLoopBelowMinimum)
        );
        assert_eq!(
            SpriteAnimation::new("", "", 0, -1),
            Err(ValidationError::EmptyAnimationName)
        );
    }

    #[test]
    fn direction_access_is_bounds_checked() {
        let mut anim = walking();
        assert_eq!(anim.max_frames(), 8);
        assert_eq!(anim.direction(2), Err(ValidationError::DirectionNotFound(2)));
        assert_eq!(anim.swap_direction(0, 5), Err(ValidationError::DirectionNotFound(5)));
        anim.swap_direction(0, 1).unwrap();
        assert_eq!(anim.direction(0).unwrap().frames(), 4);
        assert_eq!(anim.set_direction(9, SpriteDirection::default()), 2);
        assert_eq!(anim.direction_count(), 3);
        assert!(anim.remove_direction(3).is_err());
        anim.remove_direction(2).unwrap();
        assert_eq!(anim.direction_count(), 2);
    }

    #[test]
    fn data_form_lists_directions_after_header() {
        assert_eq!(
            walking().to_data(),
            "walking hero.png 2 100 0\n0\t0\t16\t24\t8\t21\t8\t8\n0\t24\t16\t24\t8\t21\t4\t4"
        );
        let renamed = walking().renamed("running");
        assert_eq!(renamed.name(), "running");
        assert_eq!(renamed.direction_count(), 2);
    }
}
