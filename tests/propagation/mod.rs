mod perturbations;
mod two_body;
