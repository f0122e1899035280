mod readiness;
mod spawn;
mod terminate;
