//! Command dispatch - turns pointer and key input into selection changes
//! and move intents

use crate::command::selection::SelectionSet;
use crate::command::{InputEvent, InputFrame, ScreenPoint};
use crate::core::config::SelectionConfig;
use crate::core::types::{Faction, Vec2};
use crate::ecs::world::World;
use crate::simulation::movement::MotionInputs;
use crate::spatial::sample_in_disk;
use rand::Rng;

/// World <-> screen mapping supplied by whoever owns the view
pub trait ScreenProjection {
    fn screen_to_world(&self, point: ScreenPoint) -> Vec2;
    fn world_to_screen(&self, position: Vec2) -> ScreenPoint;
}

/// Selection rectangle in screen space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragBox {
    pub start: ScreenPoint,
    pub end: ScreenPoint,
}

impl DragBox {
    /// Inclusive containment in the box spanned by the two corners
    pub fn contains(&self, p: ScreenPoint) -> bool {
        let (min_x, max_x) = (self.start.x.min(self.end.x), self.start.x.max(self.end.x));
        let (min_y, max_y) = (self.start.y.min(self.end.y), self.start.y.max(self.end.y));
        p.x >= min_x && p.x <= max_x && p.y >= min_y && p.y <= max_y
    }
}

/// Owns the selection and the transient pointer state
#[derive(Debug, Clone)]
pub struct CommandDispatcher {
    pub selection: SelectionSet,
    rules: SelectionConfig,
    drag: Option<DragBox>,
    /// Last issued world target while the command pointer is held
    command_target: Option<Vec2>,
    axis: Vec2,
    divide_requested: bool,
}

impl CommandDispatcher {
    pub fn new(rules: SelectionConfig) -> Self {
        Self {
            selection: SelectionSet::new(),
            rules,
            drag: None,
            command_target: None,
            axis: Vec2::ZERO,
            divide_requested: false,
        }
    }

    /// Current drag rectangle, for drawing
    pub fn drag_box(&self) -> Option<DragBox> {
        self.drag
    }

    pub fn command_target(&self) -> Option<Vec2> {
        self.command_target
    }

    /// Apply one tick's input in arrival order
    pub fn apply_frame<R: Rng + ?Sized>(
        &mut self,
        world: &mut World,
        projection: &dyn ScreenProjection,
        frame: &InputFrame,
        rng: &mut R,
    ) {
        for event in &frame.events {
            match *event {
                InputEvent::PointerDown { at, additive } => {
                    self.pointer_down(world, projection, at, additive)
                }
                InputEvent::PointerDrag { at } => self.pointer_dragging(at),
                InputEvent::PointerUp { at } => self.pointer_up(world, projection, at),
                InputEvent::CommandDown { at } => self.command_down(world, projection, at, rng),
                InputEvent::CommandDrag { at } => self.command_dragging(world, projection, at, rng),
                InputEvent::CommandUp => self.command_target = None,
                InputEvent::Axis { x, y } => self.axis = Vec2::new(x, y),
                InputEvent::Divide => self.divide_requested = true,
                InputEvent::SelectAll => self.select_all(world),
            }
        }
    }

    /// Select press: click a player cell, or start a drag box
    pub fn pointer_down(
        &mut self,
        world: &mut World,
        projection: &dyn ScreenProjection,
        at: ScreenPoint,
        additive: bool,
    ) {
        let point = projection.screen_to_world(at);
        let hit = world
            .cell_at_point(point)
            .filter(|&id| world.cell(id).is_some_and(|c| c.is_selectable()));

        if !additive {
            self.selection.clear(world, &self.rules);
        }
        match hit {
            Some(id) => {
                self.selection.select(world, id);
                tracing::debug!(cell = ?id, additive, "Cell clicked");
            }
            None => self.drag = Some(DragBox { start: at, end: at }),
        }
    }

    pub fn pointer_dragging(&mut self, at: ScreenPoint) {
        if let Some(drag) = self.drag.as_mut() {
            drag.end = at;
        }
    }

    /// Finish a drag, selecting every player cell drawn inside the box
    pub fn pointer_up(&mut self, world: &mut World, projection: &dyn ScreenProjection, at: ScreenPoint) {
        let Some(mut drag) = self.drag.take() else {
            return;
        };
        drag.end = at;

        let inside: Vec<_> = world
            .cells()
            .filter(|(_, c)| c.faction == Faction::Player)
            .filter(|(_, c)| drag.contains(projection.world_to_screen(c.position)))
            .map(|(id, _)| id)
            .collect();
        let added = inside
            .into_iter()
            .filter(|&id| self.selection.select(world, id))
            .count();
        tracing::debug!(added, "Drag selection");
    }

    /// Move-command press: send the selection toward the pointer
    pub fn command_down<R: Rng + ?Sized>(
        &mut self,
        world: &mut World,
        projection: &dyn ScreenProjection,
        at: ScreenPoint,
        rng: &mut R,
    ) {
        if self.selection.live_count(world) == 0 {
            return;
        }
        let target = projection.screen_to_world(at);
        self.command_target = Some(target);
        self.command_move(world, target, rng);
    }

    /// Drag-to-steer: re-issue once the pointer moved far enough in the world
    pub fn command_dragging<R: Rng + ?Sized>(
        &mut self,
        world: &mut World,
        projection: &dyn ScreenProjection,
        at: ScreenPoint,
        rng: &mut R,
    ) {
        let Some(previous) = self.command_target else {
            return;
        };
        if self.selection.live_count(world) == 0 {
            return;
        }
        let target = projection.screen_to_world(at);
        if previous.distance(&target) > self.rules.reissue_distance {
            self.command_target = Some(target);
            self.command_move(world, target, rng);
        }
    }

    /// Give every live selected cell a jittered move intent around `target`
    ///
    /// Jitter is drawn independently per cell from a disk whose radius
    /// grows with the selection size.
    pub fn command_move<R: Rng + ?Sized>(&mut self, world: &mut World, target: Vec2, rng: &mut R) {
        let members: Vec<_> = self.selection.live(world).map(|(id, _)| id).collect();
        let jitter = self.rules.jitter_per_unit * members.len() as f32;

        for id in &members {
            let destination = target + sample_in_disk(rng, jitter);
            if let Some(cell) = world.cell_mut(*id) {
                cell.move_target = Some(destination);
            }
        }
        tracing::debug!(?target, units = members.len(), "Move command");
    }

    /// Replace the selection with every player cell
    pub fn select_all(&mut self, world: &mut World) {
        self.selection.clear(world, &self.rules);
        let players: Vec<_> = world
            .cells()
            .filter(|(_, c)| c.faction == Faction::Player)
            .map(|(id, _)| id)
            .collect();
        for id in players {
            self.selection.select(world, id);
        }
    }

    /// Held axis if any component is past the dead zone
    pub fn active_axis(&self) -> Option<Vec2> {
        let dz = self.rules.axis_dead_zone;
        (self.axis.x.abs() > dz || self.axis.y.abs() > dz).then_some(self.axis)
    }

    /// Consume this tick's divide command
    pub fn take_divide(&mut self) -> bool {
        std::mem::take(&mut self.divide_requested)
    }

    /// Build the motion step's inputs
    ///
    /// Directional input on a group overrides pending move intents.
    pub fn prepare_motion(&self, world: &mut World) -> MotionInputs {
        let axis = self.active_axis();
        let group = self.selection.group_signals(world);
        let selected_count = group.map_or(0, |g| g.count);

        if axis.is_some() && selected_count > 1 {
            let members: Vec<_> = self.selection.live(world).map(|(id, _)| id).collect();
            for id in members {
                if let Some(cell) = world.cell_mut(id) {
                    cell.move_target = None;
                }
            }
        }

        MotionInputs {
            axis,
            selected_count,
            group,
        }
    }

    /// Tick-boundary cleanup of destroyed and converted members
    pub fn purge(&mut self, world: &World) -> usize {
        self.selection.purge(world)
    }
}
