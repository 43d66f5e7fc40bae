use crate::{
	model::{Post, User},
	Error,
};

/// Returns whether `actor` may edit or delete `post`. Only the owner may.
pub fn can_mutate(actor: &User, post: &Post) -> bool {
	actor.id == post.user_id
}

/// Gate in front of every post mutation. The post is expected to exist at
/// this point, so a failed check means "yours to see, not yours to touch"
/// and maps to 403 rather than 404.
pub fn ensure_can_mutate(actor: &User, post: &Post) -> Result<(), Error> {
	if can_mutate(actor, post) {
		Ok(())
	} else {
		Err(Error::Forbidden)
	}
}
