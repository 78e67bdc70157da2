use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::{debug, warn};

use crate::constraints::PivotJoint;
use crate::core::{BodyHandle, ConstraintHandle, ShapeHandle, SpaceHandle};
use crate::math::Vector2;
use crate::Result;

/// Something that can hold on to a grippable object
pub trait Attacher {
    /// Drops the hold. Called by the grippable while releasing, so it must
    /// not call back into that grippable.
    fn on_release(&mut self);
}

/// Shared handle to an attacher
pub type AttacherRef = Rc<RefCell<dyn Attacher>>;

struct GrippableState {
    body: BodyHandle,
    shape: ShapeHandle,
    attachers: Vec<Weak<RefCell<dyn Attacher>>>,
}

fn attacher_addr(attacher: &AttacherRef) -> *const () {
    Rc::as_ptr(attacher) as *const ()
}

impl GrippableState {
    fn position_of(&self, addr: *const ()) -> Option<usize> {
        self.attachers
            .iter()
            .position(|weak| Weak::as_ptr(weak) as *const () == addr)
    }

    fn prune(&mut self) {
        self.attachers.retain(|weak| weak.strong_count() > 0);
    }
}

/// Tracks who is currently holding an object.
///
/// Attachers are held weakly: an attacher that goes away simply drops out
/// of the set. Dropping the grippable releases every attacher.
pub struct Grippable {
    state: Rc<RefCell<GrippableState>>,
}

impl Grippable {
    /// Creates an attachment controller for the given body and shape
    pub fn new(body: BodyHandle, shape: ShapeHandle) -> Self {
        Self {
            state: Rc::new(RefCell::new(GrippableState {
                body,
                shape,
                attachers: Vec::new(),
            })),
        }
    }

    /// The body attachers hold on to
    pub fn get_body(&self) -> BodyHandle {
        self.state.borrow().body
    }

    /// The shape attachers hold on to
    pub fn get_shape(&self) -> ShapeHandle {
        self.state.borrow().shape
    }

    /// Adds an attacher. Returns false if it was already attached.
    pub fn attach(&self, attacher: &AttacherRef) -> bool {
        let mut state = self.state.borrow_mut();
        state.prune();
        if state.position_of(attacher_addr(attacher)).is_some() {
            return false;
        }
        state.attachers.push(Rc::downgrade(attacher));
        true
    }

    /// Removes an attacher without notifying it. Returns false if it was
    /// not attached.
    pub fn detach(&self, attacher: &AttacherRef) -> bool {
        let mut state = self.state.borrow_mut();
        match state.position_of(attacher_addr(attacher)) {
            Some(index) => {
                state.attachers.remove(index);
                true
            }
            None => false,
        }
    }

    /// Returns true if the attacher is currently attached
    pub fn is_attached(&self, attacher: &AttacherRef) -> bool {
        self.state.borrow().position_of(attacher_addr(attacher)).is_some()
    }

    /// Number of live attachers
    pub fn attacher_count(&self) -> usize {
        self.state
            .borrow()
            .attachers
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    /// Notifies and removes every attacher
    pub fn release_all(&self) {
        let attachers = std::mem::take(&mut self.state.borrow_mut().attachers);
        let mut released = 0;
        for attacher in attachers.iter().filter_map(Weak::upgrade) {
            attacher.borrow_mut().on_release();
            released += 1;
        }
        if released > 0 {
            debug!("Released {} attacher(s)", released);
        }
    }

    fn downgrade(&self) -> Weak<RefCell<GrippableState>> {
        Rc::downgrade(&self.state)
    }
}

impl Drop for Grippable {
    fn drop(&mut self) {
        self.release_all();
    }
}

impl std::fmt::Debug for Grippable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grippable")
            .field("body", &self.get_body())
            .field("attachers", &self.attacher_count())
            .finish()
    }
}

struct GripperState {
    space: SpaceHandle,
    body: BodyHandle,
    joint: Option<ConstraintHandle>,
    target: Weak<RefCell<GrippableState>>,
}

impl Attacher for GripperState {
    fn on_release(&mut self) {
        if let Some(joint) = self.joint.take() {
            if let Err(err) = self.space.borrow_mut().remove_constraint(joint) {
                warn!("Gripper joint {:?} was already gone: {}", joint, err);
            }
        }
        self.target = Weak::new();
    }
}

fn release_gripper(state: &Rc<RefCell<GripperState>>) {
    let target = std::mem::take(&mut state.borrow_mut().target);
    if let Some(target) = target.upgrade() {
        let me: AttacherRef = state.clone();
        let mut target = target.borrow_mut();
        if let Some(index) = target.position_of(attacher_addr(&me)) {
            target.attachers.remove(index);
        }
    }
    state.borrow_mut().on_release();
}

/// Grippers mounted on one body.
///
/// Releasing the mounts makes every live gripper let go, which removes
/// the grip joints still referencing the body.
#[derive(Default)]
pub(crate) struct GripperMounts {
    grippers: RefCell<Vec<Weak<RefCell<GripperState>>>>,
}

impl GripperMounts {
    fn register(&self, state: &Rc<RefCell<GripperState>>) {
        let mut grippers = self.grippers.borrow_mut();
        grippers.retain(|weak| weak.strong_count() > 0);
        grippers.push(Rc::downgrade(state));
    }

    /// Number of live grippers
    pub(crate) fn len(&self) -> usize {
        self.grippers
            .borrow()
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    pub(crate) fn release_all(&self) {
        let grippers = std::mem::take(&mut *self.grippers.borrow_mut());
        for state in grippers.iter().filter_map(Weak::upgrade) {
            release_gripper(&state);
        }
    }
}

impl Drop for GripperMounts {
    fn drop(&mut self) {
        self.release_all();
    }
}

/// Holds a grippable object by pinning it to the gripper's body.
///
/// Grippers are mounted through
/// [`SingleBodyModel::mount_gripper`](crate::models::SingleBodyModel::mount_gripper),
/// so the host model can let go before its body is removed.
pub struct Gripper {
    state: Rc<RefCell<GripperState>>,
}

impl Gripper {
    pub(crate) fn mount(space: SpaceHandle, body: BodyHandle, mounts: &GripperMounts) -> Self {
        let state = Rc::new(RefCell::new(GripperState {
            space,
            body,
            joint: None,
            target: Weak::new(),
        }));
        mounts.register(&state);
        debug!("Mounted gripper on {:?}", body);
        Self { state }
    }

    /// Grips `target` at the world point `anchor`, dropping any previous
    /// hold first
    pub fn grip(&self, target: &Grippable, anchor: Vector2) -> Result<()> {
        self.release();

        let (space, body) = {
            let state = self.state.borrow();
            (state.space.clone(), state.body)
        };
        let target_body = target.get_body();

        let joint = {
            let mut space = space.borrow_mut();
            let pivot = PivotJoint::from_world_pivot(
                body,
                space.body(body)?,
                target_body,
                space.body(target_body)?,
                anchor,
            );
            space.add_constraint(Box::new(pivot))?
        };

        {
            let mut state = self.state.borrow_mut();
            state.joint = Some(joint);
            state.target = target.downgrade();
        }
        let me: AttacherRef = self.state.clone();
        target.attach(&me);
        debug!("Gripper on {:?} gripped {:?} at {}", body, target_body, anchor);
        Ok(())
    }

    /// Lets go of the gripped object, if any
    pub fn release(&self) {
        release_gripper(&self.state);
    }

    /// Returns true while a grip joint exists
    pub fn is_gripping(&self) -> bool {
        self.state.borrow().joint.is_some()
    }

    /// The joint pinning the gripped object
    pub fn get_joint(&self) -> Option<ConstraintHandle> {
        self.state.borrow().joint
    }

    /// The body the gripper is mounted on
    pub fn get_body(&self) -> BodyHandle {
        self.state.borrow().body
    }

    /// The gripper as an attacher handle
    pub fn as_attacher(&self) -> AttacherRef {
        self.state.clone()
    }
}

impl Drop for Gripper {
    fn drop(&mut self) {
        self.release();
    }
}
