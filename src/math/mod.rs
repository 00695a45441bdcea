pub(crate) mod dual_quat;
pub(crate) mod pose;

pub(crate) use dual_quat::DualQuat;
pub(crate) use pose::Pose;
